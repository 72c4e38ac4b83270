//! Error types for slow-log sources.

use thiserror::Error;

/// Source operation result type.
pub type Result<T> = std::result::Result<T, SourceError>;

/// Errors raised while loading slow-log rows.
#[derive(Error, Debug)]
pub enum SourceError {
    /// SQLx error (connection, query, decoding)
    #[cfg(feature = "mysql")]
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// IO error (opening a dump file)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON array dump that does not parse
    #[error("Invalid slow log JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A JSON-lines dump with a bad line
    #[error("Invalid slow log JSON on line {line}: {source}")]
    JsonLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
