// ---------------------------------------------------------------------------
// System routes: storage connectivity check
// ---------------------------------------------------------------------------

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub sqlite_version: String,
}

/// Verifies the database is reachable and reports the engine version.
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, ApiError> {
    let store = state.store.lock().await;
    let sqlite_version = store.ping().map_err(|e| {
        warn!(error = %e, "storage connectivity check failed");
        ApiError::Internal(format!("storage unreachable: {e}"))
    })?;

    Ok(Json(HealthResponse {
        status: "ok".into(),
        sqlite_version,
    }))
}
