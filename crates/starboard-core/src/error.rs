//! Error types for starboard-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A student, card, item or tenant is absent or owned by another tenant.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The card catalog is empty; the operator must seed it.
    #[error("No items available in card pool")]
    NoItemsAvailable,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Failure reported by the storage collaborator.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Error::NotFound(what.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
