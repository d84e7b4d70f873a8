//! Data models
//!
//! Shared between club-server and its API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes (SQLite INTEGER PRIMARY KEY).
//! Amounts travel as `f64`; the server does its arithmetic in `Decimal`.

pub mod dues;
pub mod event;
pub mod ledger;
pub mod member;
pub mod user;
pub mod yearly;

// Re-exports
pub use dues::*;
pub use event::*;
pub use ledger::*;
pub use member::*;
pub use user::*;
pub use yearly::*;
