//! Error types for pasitos-core.

/// Result type for pasitos-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the map controller and its platform seams.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The location store failed.
    #[error("Store error: {0}")]
    Store(#[from] pasitos_store::Error),

    /// The map surface refused an operation.
    #[error("Map error: {0}")]
    Map(String),
}
