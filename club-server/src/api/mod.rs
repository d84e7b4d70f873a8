//! HTTP API
//!
//! # Structure
//!
//! - [`health`] - liveness and database check (public)
//! - [`users`] - user management
//! - [`members`] - roster
//! - [`incomes`] / [`expenses`] - ledger entries
//! - [`dues`] - monthly dues per member
//! - [`yearly`] - yearly balances
//! - [`events`] - special occasion payouts and their archive
//!
//! Reads are open to every operator; writes are layered with
//! [`require_permission`](crate::auth::require_permission).

pub mod dues;
pub mod events;
pub mod expenses;
pub mod health;
pub mod incomes;
pub mod members;
pub mod users;
pub mod yearly;

use serde::Deserialize;

// Re-export common types for handlers
pub use crate::utils::AppResult;

/// `?year=` query; handlers decide the default
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}
