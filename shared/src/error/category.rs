//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Operator identity errors
/// - 2xxx: Permission errors
/// - 3xxx: Roster errors
/// - 4xxx: Ledger errors
/// - 5xxx: Dues errors
/// - 6xxx: Yearly balance errors
/// - 7xxx: Event errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Operator identity errors (1xxx)
    Operator,
    /// Permission errors (2xxx)
    Permission,
    /// Roster errors (3xxx)
    Roster,
    /// Ledger errors (4xxx)
    Ledger,
    /// Dues errors (5xxx)
    Dues,
    /// Yearly balance errors (6xxx)
    Yearly,
    /// Event errors (7xxx)
    Event,
    /// System errors (8xxx, 9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Operator,
            2000..3000 => Self::Permission,
            3000..4000 => Self::Roster,
            4000..5000 => Self::Ledger,
            5000..6000 => Self::Dues,
            6000..7000 => Self::Yearly,
            7000..8000 => Self::Event,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Operator => "operator",
            Self::Permission => "permission",
            Self::Roster => "roster",
            Self::Ledger => "ledger",
            Self::Dues => "dues",
            Self::Yearly => "yearly",
            Self::Event => "event",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
