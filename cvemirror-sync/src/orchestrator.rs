// ---------------------------------------------------------------------------
// Sync orchestration
// ---------------------------------------------------------------------------
//
// One sync pass walks the feed from page 1 until the upstream reports an
// empty page. Every invocation re-walks the whole feed; already-mirrored
// ids resolve to skips, so a pass is idempotent.

use cvemirror_db::CveStore;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::fetch::FeedSource;
use crate::normalize::normalize;
use crate::writer::{WriteOutcome, write_record};

/// Settings for a sync pass.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Items requested per feed page (`resultsPerPage`).
    pub page_size: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

/// Counts reported after a sync pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncSummary {
    /// Pages fetched successfully, including the final empty page.
    pub pages: u32,
    pub inserted: u64,
    pub skipped: u64,
    /// Records whose insert failed; these never abort their page.
    pub failed: u64,
    /// Why the pass stopped before the feed was exhausted, if it did.
    pub incomplete: Option<String>,
}

impl SyncSummary {
    /// True when the pass reached the end of the feed.
    pub fn is_complete(&self) -> bool {
        self.incomplete.is_none()
    }
}

/// Drive the fetch/normalize/write loop until the feed is exhausted, the
/// fetch fails, or the token is cancelled.
///
/// Fetch failure ends the pass without retry; per-record write failures
/// are logged, counted, and do not touch sibling records.
///
/// The store lock is taken per page and released before the next fetch:
/// the rusqlite connection is `!Sync`, so a borrow of it must never live
/// across an await.
pub async fn run_sync<F: FeedSource + ?Sized>(
    source: &F,
    store: &Mutex<CveStore>,
    config: &SyncConfig,
    cancel: &CancellationToken,
) -> SyncSummary {
    let mut summary = SyncSummary::default();
    let mut page: u32 = 1;

    'pass: loop {
        if cancel.is_cancelled() {
            summary.incomplete = Some("cancelled".into());
            break;
        }

        let items = match source.fetch_page(page, config.page_size).await {
            Ok(items) => items,
            Err(e) => {
                error!(error = %e, page, "feed fetch failed, ending sync pass");
                summary.incomplete = Some(format!("fetch failed on page {page}: {e}"));
                break;
            }
        };
        summary.pages += 1;

        if items.is_empty() {
            info!(pages = summary.pages, "feed exhausted");
            break;
        }

        {
            let store = store.lock().await;
            for item in &items {
                if cancel.is_cancelled() {
                    summary.incomplete = Some("cancelled".into());
                    break 'pass;
                }
                let record = normalize(&item.cve);
                match write_record(&store, &record) {
                    Ok(WriteOutcome::Inserted) => summary.inserted += 1,
                    Ok(WriteOutcome::Skipped) => summary.skipped += 1,
                    Err(e) => {
                        warn!(error = %e, cve_id = %record.cve_id, "failed to store record");
                        summary.failed += 1;
                    }
                }
            }
        }

        page += 1;
    }

    info!(
        pages = summary.pages,
        inserted = summary.inserted,
        skipped = summary.skipped,
        failed = summary.failed,
        complete = summary.is_complete(),
        "sync pass finished"
    );
    summary
}
