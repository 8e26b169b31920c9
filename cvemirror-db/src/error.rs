#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Could not establish or initialize the database connection.
    #[error("failed to open database: {0}")]
    Connect(String),
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
