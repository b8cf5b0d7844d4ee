//! Error types for database operations.

use thiserror::Error;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Native DB error.
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A stored row no longer satisfies the registry's invariants.
    #[error("Corrupt row: {0}")]
    Corrupt(String),

    /// Registry-level error raised while converting rows.
    #[error("Registry error: {0}")]
    Registry(#[from] interplay_core::Error),
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for interplay_core::Error {
    fn from(err: Error) -> Self {
        interplay_core::Error::Store(err.to_string())
    }
}
