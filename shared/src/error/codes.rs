//! Error codes for the club ledger
//!
//! Numbered by domain, the leading digit picks the [`super::ErrorCategory`]:
//! 0xxx general, 1xxx operator, 2xxx permission, 3xxx roster, 4xxx ledger,
//! 5xxx dues, 6xxx yearly, 7xxx events, 9xxx system.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares [`ErrorCode`] with its wire value and default message, plus the
/// `u16` lookup used when decoding.
macro_rules! error_codes {
    ($( $(#[$doc:meta])* $name:ident = $value:literal => $message:literal, )+) => {
        /// Error code carried in every error body as a `u16`
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "u16", try_from = "u16")]
        #[repr(u16)]
        pub enum ErrorCode {
            $( $(#[$doc])* $name = $value, )+
        }

        impl ErrorCode {
            /// Every code, in declaration order
            pub const ALL: &'static [ErrorCode] = &[$( ErrorCode::$name, )+];

            /// Default English message
            pub const fn message(&self) -> &'static str {
                match self {
                    $( ErrorCode::$name => $message, )+
                }
            }
        }

        impl TryFrom<u16> for ErrorCode {
            type Error = InvalidErrorCode;

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $( $value => Ok(ErrorCode::$name), )+
                    _ => Err(InvalidErrorCode(value)),
                }
            }
        }
    };
}

error_codes! {
    // General
    ValidationFailed = 2 => "Validation failed",
    NotFound = 3 => "Resource not found",
    AlreadyExists = 4 => "Resource already exists",
    InvalidFormat = 6 => "Invalid format",
    RequiredField = 7 => "Required field is missing",

    // Operator identity
    /// No `X-Operator-Id` header
    OperatorRequired = 1001 => "Operator identity is required",
    OperatorUnknown = 1002 => "Operator is not a known user",
    OperatorDisabled = 1003 => "Operator account is disabled",

    // Permission
    PermissionDenied = 2001 => "Permission denied",
    /// Demoting or deactivating the last active admin
    CannotModifyAdmin = 2004 => "Cannot demote the last administrator",
    CannotDeleteAdmin = 2005 => "Cannot delete the last administrator",

    // Roster
    UserNotFound = 3001 => "User not found",
    UsernameExists = 3002 => "Username already exists",
    CannotDeleteSelf = 3003 => "Cannot delete own account",
    MemberNotFound = 3101 => "Member not found",
    /// Member still linked to a user; unlink it through user deletion first
    MemberHasUser = 3102 => "Member is linked to a user account",

    // Ledger
    IncomeNotFound = 4001 => "Income entry not found",
    ExpenseNotFound = 4002 => "Expense entry not found",
    InvalidAmount = 4003 => "Invalid amount",
    InvalidDate = 4004 => "Invalid date",
    /// Dues incomes only change amount, date and note
    DuesIncomeLocked = 4005 => "Dues income is managed by the dues ledger",

    // Dues
    InvalidMonth = 5002 => "Month must be between 1 and 12",
    DuesStatusConflict = 5003 => "Paid flag contradicts dues status",
    ZeroAmountPayment = 5004 => "Cannot record a zero-amount payment",

    // Yearly
    YearlyNotFound = 6001 => "Yearly balance not found",
    /// Only the earliest tracked year takes a manual opening
    OpeningBalanceCarried = 6002 => "Opening balance is carried from the previous year",
    InvalidYear = 6003 => "Year is out of range",

    // Events
    EventNotFound = 7001 => "Special occasion entry not found",
    EventListEmpty = 7002 => "No special occasion entries to archive",
    EventHistoryNotFound = 7003 => "Event history not found",

    // System
    InternalError = 9001 => "Internal server error",
    DatabaseError = 9002 => "Database error",
}

impl ErrorCode {
    /// Numeric wire value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// A `u16` that names no [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
