//! Club Server - membership and dues accounting for a single club
//!
//! # Module layout
//!
//! ```text
//! club-server/src/
//! ├── core/      # config, state, server, startup errors
//! ├── db/        # SQLite pool, migrations, repositories
//! ├── auth/      # operator identity, role permissions
//! ├── ledger/    # pure reconciliation core (dues, rollup, roster)
//! ├── services/  # transactional application of ledger effects
//! ├── api/       # HTTP handlers
//! ├── routes/    # router assembly and tower-http layers
//! └── utils/     # logging, validation, dates
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod ledger;
pub mod routes;
pub mod services;
pub mod utils;

// Re-export public types
pub use auth::CurrentUser;
pub use core::{Config, Server, ServerError, ServerState};
pub use routes::build_app;
pub use utils::{AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger_with_file};

/// Audit record of a write, on the `audit` target
///
/// Audit lines are kept out of the retention cleanup of application logs.
///
/// ```ignore
/// audit_log!(operator.id, "create", "income:42");
/// audit_log!(operator.id, "pay", "dues:7/2024-03", "amount=10.00");
/// ```
#[macro_export]
macro_rules! audit_log {
    ($operator_id:expr, $action:expr, $resource:expr $(, $details:expr)? $(,)?) => {
        tracing::info!(
            target: "audit",
            operator_id = $operator_id,
            action = $action,
            resource = $resource,
            $(details = $details,)?
            "AUDIT"
        )
    };
}

/// Rejected operator or permission check, on the `security` target
///
/// ```ignore
/// security_log!(WARN, "operator_unknown", operator_id = 42);
/// ```
#[macro_export]
macro_rules! security_log {
    ($level:ident, $event:expr, $($field:tt)*) => {
        tracing::event!(
            target: "security",
            tracing::Level::$level,
            event = $event,
            $($field)*
        )
    };
}
