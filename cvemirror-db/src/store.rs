use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use tracing::debug;

use crate::error::DbError;
use crate::schema;

/// Local mirror of the CVE feed, backed by SQLite.
///
/// One `CveStore` wraps one connection; it is shared for the lifetime of a
/// sync run (and of the API process) rather than opened per call.
pub struct CveStore {
    conn: Connection,
}

/// A normalized CVE record as persisted.
///
/// The severity columns (`cvss_score`, `cvss_vector`, `severity`,
/// `vuln_status`) are reserved and currently always hold empty/zero
/// defaults; the unparsed metrics stay available in `raw`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CveRecord {
    pub cve_id: String,
    pub description: String,
    pub published: String,
    pub last_modified: String,
    pub cvss_score: f64,
    pub cvss_vector: String,
    pub severity: String,
    pub vuln_status: String,
    pub references: Vec<Value>,
    pub weaknesses: Vec<Value>,
    pub configurations: Vec<Value>,
    pub raw: Value,
}

/// Lightweight listing row (no JSON blob columns).
#[derive(Debug, Clone, serde::Serialize)]
pub struct CveSummary {
    pub cve_id: String,
    pub description: String,
    pub published: String,
    pub last_modified: String,
}

fn default_db_path() -> PathBuf {
    if cfg!(windows) {
        let appdata = std::env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(appdata).join("cvemirror").join("cvemirror.db")
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".cvemirror").join("cvemirror.db")
    }
}

impl CveStore {
    /// Open (or create) the database at the default location.
    pub fn open_default() -> Result<Self, DbError> {
        let path = default_db_path();
        Self::open(&path)
    }

    /// Open a database at a specific path.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DbError::Connect(format!(
                    "failed to create db directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
        let conn =
            Connection::open(path).map_err(|e| DbError::Connect(e.to_string()))?;
        schema::initialize(&conn)?;
        debug!(path = %path.display(), "CVE database opened");
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::Connect(e.to_string()))?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    /// Verify the database is reachable; returns the SQLite version string.
    pub fn ping(&self) -> Result<String, DbError> {
        let version: String =
            self.conn
                .query_row("SELECT sqlite_version()", [], |row| row.get(0))?;
        Ok(version)
    }

    /// True iff a record with this CVE id is already mirrored.
    pub fn cve_exists(&self, cve_id: &str) -> Result<bool, DbError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM cve_records WHERE cve_id = ?1",
            params![cve_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Insert a record. Fails on a duplicate id — callers are expected to
    /// run `cve_exists` first; the primary key is only the safety net.
    pub fn insert_cve(&self, record: &CveRecord) -> Result<(), DbError> {
        let references_json = serde_json::to_string(&record.references)?;
        let weaknesses_json = serde_json::to_string(&record.weaknesses)?;
        let configurations_json = serde_json::to_string(&record.configurations)?;
        let raw_json = serde_json::to_string(&record.raw)?;

        self.conn.execute(
            "INSERT INTO cve_records (cve_id, description, published, last_modified, \
             cvss_score, cvss_vector, severity, vuln_status, \
             references_json, weaknesses_json, configurations_json, raw_json) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                record.cve_id,
                record.description,
                record.published,
                record.last_modified,
                record.cvss_score,
                record.cvss_vector,
                record.severity,
                record.vuln_status,
                references_json,
                weaknesses_json,
                configurations_json,
                raw_json,
            ],
        )?;
        debug!(cve_id = %record.cve_id, "CVE record inserted");
        Ok(())
    }

    /// Load the full record for one CVE id.
    pub fn get_cve(&self, cve_id: &str) -> Result<Option<CveRecord>, DbError> {
        let row = self
            .conn
            .query_row(
                "SELECT cve_id, description, published, last_modified, \
                 cvss_score, cvss_vector, severity, vuln_status, \
                 references_json, weaknesses_json, configurations_json, raw_json \
                 FROM cve_records WHERE cve_id = ?1",
                params![cve_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, f64>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                        row.get::<_, String>(7)?,
                        row.get::<_, String>(8)?,
                        row.get::<_, String>(9)?,
                        row.get::<_, String>(10)?,
                        row.get::<_, String>(11)?,
                    ))
                },
            )
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(CveRecord {
            cve_id: row.0,
            description: row.1,
            published: row.2,
            last_modified: row.3,
            cvss_score: row.4,
            cvss_vector: row.5,
            severity: row.6,
            vuln_status: row.7,
            references: serde_json::from_str(&row.8)?,
            weaknesses: serde_json::from_str(&row.9)?,
            configurations: serde_json::from_str(&row.10)?,
            raw: serde_json::from_str(&row.11)?,
        }))
    }

    /// One page of the listing, ordered by CVE id. `page` is 1-based.
    pub fn list_cves(&self, page: u32, per_page: u32) -> Result<Vec<CveSummary>, DbError> {
        let offset = (page.saturating_sub(1) as i64) * per_page as i64;
        let mut stmt = self.conn.prepare(
            "SELECT cve_id, description, published, last_modified \
             FROM cve_records ORDER BY cve_id LIMIT ?1 OFFSET ?2",
        )?;
        let rows = stmt.query_map(params![per_page as i64, offset], |row| {
            Ok(CveSummary {
                cve_id: row.get(0)?,
                description: row.get(1)?,
                published: row.get(2)?,
                last_modified: row.get(3)?,
            })
        })?;
        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(row?);
        }
        Ok(summaries)
    }

    /// Total number of mirrored records.
    pub fn count_cves(&self) -> Result<u64, DbError> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM cve_records", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str) -> CveRecord {
        CveRecord {
            cve_id: id.to_string(),
            description: format!("description of {id}"),
            published: "2024-01-10T00:00:00.000".into(),
            last_modified: "2024-02-01T00:00:00.000".into(),
            cvss_score: 0.0,
            cvss_vector: String::new(),
            severity: String::new(),
            vuln_status: String::new(),
            references: vec![json!({"url": "https://example.com/advisory"})],
            weaknesses: vec![],
            configurations: vec![],
            raw: json!({"id": id, "published": "2024-01-10T00:00:00.000"}),
        }
    }

    #[test]
    fn insert_and_get_round_trip() {
        let store = CveStore::open_in_memory().unwrap();
        store.insert_cve(&record("CVE-2024-0001")).unwrap();

        let loaded = store.get_cve("CVE-2024-0001").unwrap().unwrap();
        assert_eq!(loaded.cve_id, "CVE-2024-0001");
        assert_eq!(loaded.description, "description of CVE-2024-0001");
        assert_eq!(loaded.references.len(), 1);
        assert_eq!(loaded.raw["id"], "CVE-2024-0001");
        assert_eq!(loaded.cvss_score, 0.0);
        assert_eq!(loaded.severity, "");
    }

    #[test]
    fn exists_reflects_inserts() {
        let store = CveStore::open_in_memory().unwrap();
        assert!(!store.cve_exists("CVE-2024-0001").unwrap());
        store.insert_cve(&record("CVE-2024-0001")).unwrap();
        assert!(store.cve_exists("CVE-2024-0001").unwrap());
        assert!(!store.cve_exists("CVE-2024-0002").unwrap());
    }

    #[test]
    fn duplicate_insert_is_a_constraint_error() {
        let store = CveStore::open_in_memory().unwrap();
        store.insert_cve(&record("CVE-2024-0001")).unwrap();
        let err = store.insert_cve(&record("CVE-2024-0001"));
        assert!(matches!(err, Err(DbError::Sqlite(_))));
        // The first row survives untouched.
        assert_eq!(store.count_cves().unwrap(), 1);
    }

    #[test]
    fn empty_id_is_rejected_by_the_schema() {
        let store = CveStore::open_in_memory().unwrap();
        let err = store.insert_cve(&record(""));
        assert!(matches!(err, Err(DbError::Sqlite(_))));
        assert_eq!(store.count_cves().unwrap(), 0);
    }

    #[test]
    fn get_missing_returns_none() {
        let store = CveStore::open_in_memory().unwrap();
        assert!(store.get_cve("CVE-1999-9999").unwrap().is_none());
    }

    #[test]
    fn listing_pages_in_id_order() {
        let store = CveStore::open_in_memory().unwrap();
        for i in 1..=25 {
            store.insert_cve(&record(&format!("CVE-2024-{i:04}"))).unwrap();
        }

        let page1 = store.list_cves(1, 10).unwrap();
        assert_eq!(page1.len(), 10);
        assert_eq!(page1[0].cve_id, "CVE-2024-0001");

        let page3 = store.list_cves(3, 10).unwrap();
        assert_eq!(page3.len(), 5);
        assert_eq!(page3[0].cve_id, "CVE-2024-0021");

        assert!(store.list_cves(4, 10).unwrap().is_empty());
        assert_eq!(store.count_cves().unwrap(), 25);
    }

    #[test]
    fn ping_returns_sqlite_version() {
        let store = CveStore::open_in_memory().unwrap();
        let version = store.ping().unwrap();
        assert!(!version.is_empty());
    }
}
