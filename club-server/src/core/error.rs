//! Startup and serve errors
//!
//! Request-level failures use [`crate::AppError`]; this type covers
//! everything that can stop the process.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<shared::error::AppError> for ServerError {
    fn from(err: shared::error::AppError) -> Self {
        match err.code.category() {
            shared::error::ErrorCategory::System => ServerError::Database(err.message),
            // anything else at startup comes from bad settings (e.g. bootstrap admin)
            _ => ServerError::Config(err.message),
        }
    }
}

/// Result type of startup and serve paths
pub type Result<T> = std::result::Result<T, ServerError>;
