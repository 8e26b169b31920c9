// ---------------------------------------------------------------------------
// Record writing
// ---------------------------------------------------------------------------

use cvemirror_db::{CveRecord, CveStore, DbError};
use tracing::info;

/// Result of a single write attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Inserted,
    Skipped,
}

/// Persist one record, inserting at most once per CVE id.
///
/// The existence check runs before every insert; the primary key on
/// `cve_id` is only a safety net. Records are never updated after the
/// first insert, even if the upstream copy changed since.
pub fn write_record(store: &CveStore, record: &CveRecord) -> Result<WriteOutcome, DbError> {
    if store.cve_exists(&record.cve_id)? {
        info!(cve_id = %record.cve_id, "already mirrored, skipping");
        return Ok(WriteOutcome::Skipped);
    }
    store.insert_cve(record)?;
    Ok(WriteOutcome::Inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::types::{FeedCve, FeedDescription};

    fn record(id: &str) -> CveRecord {
        normalize(&FeedCve {
            id: id.to_string(),
            descriptions: vec![FeedDescription {
                lang: "en".into(),
                value: "a bug".into(),
            }],
            published: "2024-01-10T00:00:00.000".into(),
            last_modified: "2024-02-01T00:00:00.000".into(),
            references: vec![],
            weaknesses: vec![],
            configurations: vec![],
            extra: serde_json::Map::new(),
        })
    }

    #[test]
    fn first_write_inserts_second_skips() {
        let store = CveStore::open_in_memory().unwrap();
        let rec = record("CVE-2024-0001");

        assert_eq!(write_record(&store, &rec).unwrap(), WriteOutcome::Inserted);
        assert_eq!(write_record(&store, &rec).unwrap(), WriteOutcome::Skipped);
        assert_eq!(store.count_cves().unwrap(), 1);
    }

    #[test]
    fn skip_leaves_the_original_row() {
        let store = CveStore::open_in_memory().unwrap();
        write_record(&store, &record("CVE-2024-0001")).unwrap();

        // A later item with the same id but a changed description is a no-op.
        let mut changed = record("CVE-2024-0001");
        changed.description = "revised text".into();
        assert_eq!(
            write_record(&store, &changed).unwrap(),
            WriteOutcome::Skipped
        );

        let stored = store.get_cve("CVE-2024-0001").unwrap().unwrap();
        assert_eq!(stored.description, "a bug");
    }
}
