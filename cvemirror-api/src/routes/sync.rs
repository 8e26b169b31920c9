// ---------------------------------------------------------------------------
// Sync trigger route
// ---------------------------------------------------------------------------

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use cvemirror_sync::{SyncSummary, run_sync};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub message: String,
    pub summary: SyncSummary,
}

/// Run one full sync pass to completion and report its counts.
pub async fn trigger_sync(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SyncResponse>, ApiError> {
    // The pass lock keeps whole syncs sequential: a second trigger waits
    // instead of interleaving pages with a running pass.
    let _pass = state.sync_lock.lock().await;
    let cancel = CancellationToken::new();

    info!(page_size = state.sync.page_size, "sync pass triggered");
    let summary = run_sync(state.feed.as_ref(), &state.store, &state.sync, &cancel).await;

    let message = match summary.incomplete {
        None => format!(
            "CVE data synced successfully: {} inserted, {} skipped, {} failed",
            summary.inserted, summary.skipped, summary.failed
        ),
        Some(ref reason) => format!(
            "sync stopped early ({reason}): {} inserted, {} skipped, {} failed",
            summary.inserted, summary.skipped, summary.failed
        ),
    };

    Ok(Json(SyncResponse { message, summary }))
}
