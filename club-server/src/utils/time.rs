//! Date helpers
//!
//! Ledger dates travel as `YYYY-MM-DD` strings; the owning year/month of an
//! entry defaults to the date's components.

use chrono::{Datelike, NaiveDate};

use super::validation::{validate_month, validate_year};
use super::{AppError, AppResult, ErrorCode};

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
        AppError::with_message(ErrorCode::InvalidDate, format!("Invalid date format: {date}"))
            .with_detail("date", date)
    })
}

/// Resolve the owning (year, month) of a dated entry
///
/// Explicit values win over the date's components.
pub fn owning_period(date: &str, year: Option<i32>, month: Option<u32>) -> AppResult<(i32, u32)> {
    let parsed = parse_date(date)?;
    let year = validate_year(year.unwrap_or(parsed.year()))?;
    let month = validate_month(month.unwrap_or(parsed.month()))?;
    Ok((year, month))
}

/// Current local year
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}
