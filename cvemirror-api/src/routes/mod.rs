// ---------------------------------------------------------------------------
// Route registration
// ---------------------------------------------------------------------------

mod cves;
mod sync;
mod system;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    // The mirror serves public read-only data; any origin may read it.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .route("/api/system/health", get(system::health_check))
        .route("/api/sync", post(sync::trigger_sync))
        .route("/api/cves", get(cves::list_cves))
        .route("/api/cves/{id}", get(cves::cve_detail))
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(64 * 1024))
        .with_state(state)
}
