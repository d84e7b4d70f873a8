//! Operator identity and role gating
//!
//! There is no login: callers name themselves with the `X-Operator-Id`
//! header and the role of that user decides what they may write.
//! - [`CurrentUser`] - resolved operator
//! - [`require_operator`] - resolves the header, injects [`CurrentUser`]
//! - [`require_permission`] - per-route permission check
//! - [`credential`] - argon2 hashing of stored credentials

pub mod credential;
pub mod middleware;
pub mod operator;
pub mod permissions;

pub use middleware::{require_operator, require_permission};
pub use operator::{CurrentUser, OPERATOR_HEADER};
