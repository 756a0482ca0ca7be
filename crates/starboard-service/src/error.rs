//! Error types for starboard-service

use thiserror::Error;

/// Result type for service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in starboard-service
#[derive(Debug, Error)]
pub enum Error {
    /// Domain error from the engine or the repository
    #[error("{0}")]
    Core(#[from] starboard_core::Error),

    /// Error opening or upgrading the store
    #[error("database error: {0}")]
    Db(#[from] starboard_db::Error),

    /// Error loading the special card table
    #[error("card table error: {0}")]
    Script(#[from] starboard_script::Error),

    #[error("config error: {0}")]
    Config(String),
}

