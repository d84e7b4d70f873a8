//! Permission Definitions
//!
//! Static role → permission table. Reads are open to every operator;
//! writes need one of these.

use shared::models::UserRole;

/// Every permission checked by a route
pub const ALL_PERMISSIONS: &[&str] = &[
    "users:manage",  // users and roster maintenance
    "ledger:write",  // incomes and expenses
    "dues:write",    // monthly dues, unpaid overrides
    "yearly:write",  // opening balance, rollup refresh
    "events:write",  // special occasion payouts and resets
];

pub const ADMIN_PERMISSIONS: &[&str] = &["all"];

pub const TREASURER_PERMISSIONS: &[&str] =
    &["ledger:write", "dues:write", "yearly:write", "events:write"];

pub const MEMBER_PERMISSIONS: &[&str] = &[];

/// Permissions granted to a role
pub fn role_permissions(role: UserRole) -> &'static [&'static str] {
    match role {
        UserRole::Admin => ADMIN_PERMISSIONS,
        UserRole::Treasurer => TREASURER_PERMISSIONS,
        UserRole::Member => MEMBER_PERMISSIONS,
    }
}
