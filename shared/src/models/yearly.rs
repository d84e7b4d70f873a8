//! Yearly Balance Model

use serde::{Deserialize, Serialize};

/// Aggregated ledger totals of one month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthTotals {
    pub month: u32,
    pub income: f64,
    pub expense: f64,
}

/// Balance rollup of one year
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct YearlyData {
    pub year: i32,
    /// Equals the previous year's closing balance
    pub opening_balance: f64,
    /// Only the earliest tracked year may be set by hand
    pub opening_is_manual: bool,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub months: Vec<MonthTotals>,
    pub total_income: f64,
    pub total_expense: f64,
    pub closing_balance: f64,
    pub updated_at: i64,
}

/// Opening balance payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpeningBalanceUpdate {
    pub opening_balance: f64,
}
