//! Shared types for the club ledger
//!
//! Domain models, the unified error system and small id/clock helpers
//! used by the server and its API clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
