//! Utilities - logging, validation and date helpers
//!
//! Error types come from `shared::error` and are re-exported here so handlers
//! can write `crate::utils::AppResult`.

pub mod logger;
pub mod time;
pub mod validation;

pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode};
