//! Common error types for rezone

use thiserror::Error;

/// Common result type for rezone operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the rezone services
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// User-facing message without the variant prefix.
    ///
    /// API handlers return the bare validation message ("Distance must
    /// be a number"), not the Display form with its category prefix.
    pub fn user_message(&self) -> String {
        match self {
            Error::Config(m)
            | Error::NotFound(m)
            | Error::InvalidInput(m)
            | Error::Internal(m) => m.clone(),
            other => other.to_string(),
        }
    }
}
