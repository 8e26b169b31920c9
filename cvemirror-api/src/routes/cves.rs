// ---------------------------------------------------------------------------
// CVE listing and detail routes
// ---------------------------------------------------------------------------

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use tracing::warn;

use cvemirror_db::{CveRecord, CveSummary};

use crate::error::ApiError;
use crate::state::AppState;

const MAX_PER_PAGE: u32 = 200;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    10
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub cves: Vec<CveSummary>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u64,
}

/// Pages needed to show `total` records: ceiling division, so an exact
/// multiple gets no trailing remainder page.
fn total_pages(total: u64, per_page: u32) -> u64 {
    total.div_ceil(per_page as u64)
}

pub async fn list_cves(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    if query.page == 0 {
        return Err(ApiError::BadRequest("page must be at least 1".into()));
    }
    if query.per_page == 0 || query.per_page > MAX_PER_PAGE {
        return Err(ApiError::BadRequest(format!(
            "per_page must be between 1 and {MAX_PER_PAGE}"
        )));
    }

    let store = state.store.lock().await;
    let cves = store.list_cves(query.page, query.per_page).map_err(|e| {
        warn!(error = %e, "failed to list CVE records");
        ApiError::Internal("failed to read from database".into())
    })?;
    let total = store.count_cves().map_err(|e| {
        warn!(error = %e, "failed to count CVE records");
        ApiError::Internal("failed to read from database".into())
    })?;

    Ok(Json(ListResponse {
        cves,
        page: query.page,
        per_page: query.per_page,
        total,
        total_pages: total_pages(total, query.per_page),
    }))
}

pub async fn cve_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CveRecord>, ApiError> {
    let store = state.store.lock().await;
    let record = store
        .get_cve(&id)
        .map_err(|e| {
            warn!(error = %e, cve_id = %id, "failed to load CVE record");
            ApiError::Internal("failed to read from database".into())
        })?
        .ok_or_else(|| ApiError::NotFound(format!("CVE not found: {id}")))?;

    Ok(Json(record))
}

#[cfg(test)]
mod tests {
    use super::total_pages;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(21, 10), 3);
    }

    #[test]
    fn exact_multiple_gets_no_extra_page() {
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(total_pages(10, 10), 1);
    }

    #[test]
    fn empty_table_has_zero_pages() {
        assert_eq!(total_pages(0, 10), 0);
    }
}
