//! Error types for pasitos-store.

use std::path::PathBuf;

/// Result type for pasitos-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pasitos-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error from SQLite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failed to create database directory.
    #[error("Failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A record field was outside its valid range.
    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] pasitos_types::ParseError),

    /// Invalid timestamp.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
