mod error;
mod schema;
mod store;

pub use error::DbError;
pub use store::{CveRecord, CveStore, CveSummary};
