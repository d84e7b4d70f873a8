//! Income / Expense Models

use serde::{Deserialize, Serialize};

/// Category used for incomes mirrored from the dues ledger
pub const DUES_CATEGORY: &str = "dues";

/// Where an income entry came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum IncomeSource {
    Manual,
    Dues,
}

/// Income entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Income {
    pub id: i64,
    /// YYYY-MM-DD
    pub date: String,
    /// Owning year/month (defaults to the date's)
    pub year: i32,
    pub month: u32,
    pub category: String,
    pub amount: f64,
    pub note: Option<String>,
    pub member_id: Option<i64>,
    pub source: IncomeSource,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Expense entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Expense {
    pub id: i64,
    pub date: String,
    pub year: i32,
    pub month: u32,
    pub category: String,
    pub amount: f64,
    pub note: Option<String>,
    pub member_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create payload shared by incomes and expenses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntryCreate {
    pub date: String,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub category: String,
    pub amount: f64,
    pub note: Option<String>,
    pub member_id: Option<i64>,
}

/// Update payload shared by incomes and expenses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerEntryUpdate {
    pub date: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub note: Option<String>,
    pub member_id: Option<i64>,
}

/// List filter (`?year=&month=&member_id=`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub member_id: Option<i64>,
}
