//! Dues Model

use serde::{Deserialize, Serialize};

/// Status of one month of dues
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DuesStatus {
    Unpaid,
    Paid,
    /// Not owed this month (leave, honorary, ...)
    Exempt,
}

impl DuesStatus {
    /// Display color used when the month carries no explicit color
    pub fn default_color(&self) -> &'static str {
        match self {
            DuesStatus::Unpaid => "#f44336",
            DuesStatus::Paid => "#4caf50",
            DuesStatus::Exempt => "#9e9e9e",
        }
    }
}

/// One month of a member's dues year
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyDue {
    /// 1..=12
    pub month: u32,
    pub paid: bool,
    pub amount: f64,
    pub status: DuesStatus,
    pub color: String,
    /// Income entry mirroring this payment (set iff paid)
    pub income_id: Option<i64>,
}

/// Dues of one member for one year
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DuesData {
    pub member_id: i64,
    pub year: i32,
    /// Always twelve entries, ordered by month
    #[cfg_attr(feature = "db", sqlx(json))]
    pub months: Vec<MonthlyDue>,
    /// Running total, user-editable
    pub unpaid_amount: f64,
    /// 0 while the record only exists in memory
    pub updated_at: i64,
}

/// Edit of a single dues month
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonthChange {
    pub paid: Option<bool>,
    pub amount: Option<f64>,
    pub status: Option<DuesStatus>,
    pub color: Option<String>,
    /// Date of the income recorded when this change pays the month
    /// (defaults to today); ignored otherwise, move a recorded payment
    /// through the income ledger
    pub paid_on: Option<String>,
}

/// Manual override of the unpaid total
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnpaidOverride {
    pub unpaid_amount: f64,
}

/// Per-member row of the yearly dues overview
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DuesSummary {
    pub member_id: i64,
    pub member_name: String,
    pub year: i32,
    pub statuses: Vec<DuesStatus>,
    pub paid_months: u32,
    pub unpaid_months: u32,
    pub exempt_months: u32,
    pub paid_total: f64,
    pub unpaid_amount: f64,
}
