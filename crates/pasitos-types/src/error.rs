//! Error types for value validation in pasitos-types.

use thiserror::Error;

/// Errors raised when constructing a value outside its valid range.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Latitude outside -90..=90 or not finite.
    #[error("Invalid latitude: {0}")]
    InvalidLatitude(f64),

    /// Longitude outside -180..=180 or not finite.
    #[error("Invalid longitude: {0}")]
    InvalidLongitude(f64),

    /// Battery percentage above 100.
    #[error("Invalid battery percentage: {0}")]
    InvalidBattery(u32),
}

/// Result type alias using pasitos-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
