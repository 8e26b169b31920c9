// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

use std::sync::Arc;

use cvemirror_db::CveStore;
use cvemirror_sync::{FeedSource, SyncConfig};
use tokio::sync::Mutex;

/// Global application state for the API server.
pub struct AppState {
    /// Mirrored CVE database. One connection for the whole process; the
    /// orchestrator locks it per page so no store borrow crosses an await.
    pub store: Mutex<CveStore>,
    /// Upstream feed handle. A trait object so tests can script pages.
    pub feed: Arc<dyn FeedSource>,
    pub sync: SyncConfig,
    /// Held for the full duration of a sync pass: a second trigger waits
    /// for the whole pass instead of interleaving pages with it.
    pub sync_lock: Mutex<()>,
}

impl AppState {
    pub fn new(store: CveStore, feed: Arc<dyn FeedSource>, sync: SyncConfig) -> Self {
        Self {
            store: Mutex::new(store),
            feed,
            sync,
            sync_lock: Mutex::new(()),
        }
    }

    /// Create an AppState with an in-memory database (for testing).
    pub fn new_in_memory(feed: Arc<dyn FeedSource>, sync: SyncConfig) -> Self {
        let store = CveStore::open_in_memory().expect("failed to open in-memory database");
        Self::new(store, feed, sync)
    }
}
