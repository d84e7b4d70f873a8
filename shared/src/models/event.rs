//! Special Occasion Models

use serde::{Deserialize, Serialize};

/// Live special occasion payout (wedding gift, condolence money, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SpecialEvent {
    pub id: i64,
    pub year: i32,
    pub member_id: Option<i64>,
    pub recipient: String,
    pub occasion: String,
    pub amount: f64,
    pub date: String,
    pub note: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create special occasion payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialEventCreate {
    /// Defaults to the year of `date`
    pub year: Option<i32>,
    pub member_id: Option<i64>,
    pub recipient: String,
    pub occasion: String,
    pub amount: f64,
    pub date: String,
    pub note: Option<String>,
}

/// Update special occasion payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecialEventUpdate {
    pub member_id: Option<i64>,
    pub recipient: Option<String>,
    pub occasion: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<String>,
    pub note: Option<String>,
}

/// Archived snapshot of a year's live list, taken on reset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct EventHistory {
    pub id: i64,
    pub year: i32,
    pub archived_at: i64,
    pub archived_by: Option<i64>,
    pub entry_count: i64,
    pub total_amount: f64,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub entries: Vec<SpecialEvent>,
}
