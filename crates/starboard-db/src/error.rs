//! Error types for database operations.

use thiserror::Error;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Native DB error.
    #[error("Database error: {0}")]
    Database(String),

    /// A row referenced by an update does not exist.
    #[error("Row not found: {0}")]
    NotFound(String),

    /// A unique key is already taken.
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for starboard_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(what) => starboard_core::Error::NotFound(what),
            Error::DuplicateKey(what) => starboard_core::Error::Conflict(what),
            other => starboard_core::Error::Storage(other.to_string()),
        }
    }
}
