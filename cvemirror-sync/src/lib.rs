pub mod fetch;
pub mod normalize;
pub mod orchestrator;
pub mod types;
pub mod writer;

pub use fetch::{DEFAULT_FEED_URL, FeedSource, FetchError, NvdClient};
pub use normalize::normalize;
pub use orchestrator::{SyncConfig, SyncSummary, run_sync};
pub use types::{FeedCve, FeedDescription, FeedItem, FeedPage};
pub use writer::{WriteOutcome, write_record};
