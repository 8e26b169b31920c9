// ---------------------------------------------------------------------------
// REST API server
// ---------------------------------------------------------------------------
//
// Exposes the mirrored CVE data and the sync trigger over HTTP.

pub mod error;
mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use state::AppState;

/// Build the axum Router (useful for testing).
pub fn build_router(state: Arc<AppState>) -> axum::Router {
    routes::build_router(state)
}

/// Start the API server and block until shutdown (Ctrl+C).
pub async fn start_server(listen_addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(addr = %listen_addr, "cvemirror API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("API server shut down");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    tracing::info!("shutdown signal received");
}
