//! Error system shared by the server and its clients
//!
//! [`AppError`] pairs an [`ErrorCode`] with a message and optional details;
//! handlers return it directly and it renders as an [`ErrorBody`] with the
//! code's HTTP status. Codes are grouped by domain, see [`ErrorCategory`].
//!
//! ```
//! use shared::error::{AppError, ErrorBody, ErrorCode};
//!
//! let err = AppError::with_message(ErrorCode::InvalidMonth, "Month 13 is out of range")
//!     .with_detail("month", 13);
//!
//! let body = ErrorBody::from(&err);
//! assert_eq!(body.code.code(), 5002);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorBody};
