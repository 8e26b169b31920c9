use crate::error::DbError;

const SCHEMA_SQL: &str = r#"
-- Mirrored CVE records (one row per CVE id, insert-once).
-- The three structured feed fields and the full upstream record are kept
-- as serialized JSON text.
CREATE TABLE IF NOT EXISTS cve_records (
    cve_id              TEXT PRIMARY KEY CHECK (cve_id <> ''),
    description         TEXT NOT NULL,
    published           TEXT NOT NULL,
    last_modified       TEXT NOT NULL,
    cvss_score          REAL NOT NULL DEFAULT 0,
    cvss_vector         TEXT NOT NULL DEFAULT '',
    severity            TEXT NOT NULL DEFAULT '',
    vuln_status         TEXT NOT NULL DEFAULT '',
    references_json     TEXT NOT NULL DEFAULT '[]',
    weaknesses_json     TEXT NOT NULL DEFAULT '[]',
    configurations_json TEXT NOT NULL DEFAULT '[]',
    raw_json            TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_cve_published ON cve_records(published);
"#;

pub fn initialize(conn: &rusqlite::Connection) -> Result<(), DbError> {
    // WAL before DDL for crash safety during the initial schema creation.
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
