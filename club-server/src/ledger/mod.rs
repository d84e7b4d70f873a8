//! Reconciliation core
//!
//! Pure functions over in-memory values. Nothing here touches the database;
//! the services in [`crate::services`] load records, call into this module and
//! apply the returned effects inside one SQLite transaction.
//!
//! - [`money`] - Decimal helpers (2 dp, half-up)
//! - [`dues`] - monthly dues state machine and income mirroring effects
//! - [`rollup`] - month totals and year-over-year carryover
//! - [`roster`] - user/member reconciliation plan

pub mod dues;
pub mod money;
pub mod rollup;
pub mod roster;

pub use dues::LedgerEffect;
pub use roster::RosterPlan;
