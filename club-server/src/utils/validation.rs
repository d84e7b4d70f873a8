//! Input validation helpers
//!
//! Centralized text length constants and validation functions for handlers
//! and services. SQLite TEXT has no built-in length enforcement.

use rust_decimal::Decimal;

use crate::ledger::money::to_decimal;
use crate::utils::{AppError, AppResult, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: display names, member names, recipients, categories
pub const MAX_NAME_LEN: usize = 200;

/// Notes and occasion descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: usernames, color codes
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Upper bound for any single monetary amount
pub const MAX_AMOUNT: f64 = 1_000_000.0;

/// Earliest and latest accepted ledger years
pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 9999;

// ── Text ────────────────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(
            AppError::with_message(ErrorCode::RequiredField, format!("{field} must not be empty"))
                .with_detail("field", field),
        );
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(value: &Option<String>, field: &str, max_len: usize) -> AppResult<()> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Usernames: 1..=100 chars of `[A-Za-z0-9_.-]`
pub fn validate_username(username: &str) -> AppResult<()> {
    validate_required_text(username, "username", MAX_SHORT_TEXT_LEN)?;
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(AppError::with_message(
            ErrorCode::InvalidFormat,
            "username may only contain letters, digits, '_', '.' and '-'",
        )
        .with_detail("field", "username"));
    }
    Ok(())
}

/// Display colors: `#rgb` or `#rrggbb`
pub fn validate_color(color: &str) -> AppResult<()> {
    let hex = color.strip_prefix('#').unwrap_or("");
    let ok = matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit());
    if !ok {
        return Err(
            AppError::with_message(ErrorCode::InvalidFormat, format!("Invalid color: {color}"))
                .with_detail("field", "color"),
        );
    }
    Ok(())
}

// ── Periods ─────────────────────────────────────────────────────────

/// Month number must be 1..=12
pub fn validate_month(month: u32) -> AppResult<u32> {
    if !(1..=12).contains(&month) {
        return Err(
            AppError::with_message(ErrorCode::InvalidMonth, format!("Month {month} is out of range"))
                .with_detail("month", month),
        );
    }
    Ok(month)
}

pub fn validate_year(year: i32) -> AppResult<i32> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(
            AppError::with_message(ErrorCode::InvalidYear, format!("Year {year} is out of range"))
                .with_detail("year", year),
        );
    }
    Ok(year)
}

// ── Amounts ─────────────────────────────────────────────────────────

fn invalid_amount(field: &str, message: String, value: f64) -> AppError {
    AppError::with_message(ErrorCode::InvalidAmount, message)
        .with_detail("field", field)
        .with_detail("value", value)
}

/// Amount must be finite, >= 0 and below [`MAX_AMOUNT`]
pub fn validate_amount(value: f64, field: &str) -> AppResult<Decimal> {
    if !value.is_finite() {
        return Err(invalid_amount(
            field,
            format!("{field} must be a finite number"),
            0.0,
        ));
    }
    if value < 0.0 {
        return Err(invalid_amount(
            field,
            format!("{field} must be non-negative, got {value}"),
            value,
        ));
    }
    if value > MAX_AMOUNT {
        return Err(invalid_amount(
            field,
            format!("{field} exceeds maximum allowed ({MAX_AMOUNT}), got {value}"),
            value,
        ));
    }
    Ok(to_decimal(value))
}

/// Ledger and payout entries carry strictly positive amounts
pub fn validate_positive_amount(value: f64, field: &str) -> AppResult<Decimal> {
    let amount = validate_amount(value, field)?;
    if amount.is_zero() {
        return Err(invalid_amount(
            field,
            format!("{field} must be greater than zero"),
            value,
        ));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_blank_and_long() {
        assert!(validate_required_text("Alice", "name", MAX_NAME_LEN).is_ok());
        let err = validate_required_text("   ", "name", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        let long = "x".repeat(MAX_NAME_LEN + 1);
        let err = validate_required_text(&long, "name", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn optional_text_only_checks_length() {
        assert!(validate_optional_text(&None, "note", 5).is_ok());
        assert!(validate_optional_text(&Some("".into()), "note", 5).is_ok());
        assert!(validate_optional_text(&Some("123456".into()), "note", 5).is_err());
    }

    #[test]
    fn username_charset() {
        assert!(validate_username("treasurer.kim").is_ok());
        assert!(validate_username("a-b_c").is_ok());
        assert_eq!(
            validate_username("bad name").unwrap_err().code,
            ErrorCode::InvalidFormat
        );
    }

    #[test]
    fn color_format() {
        assert!(validate_color("#4caf50").is_ok());
        assert!(validate_color("#FFF").is_ok());
        assert!(validate_color("4caf50").is_err());
        assert!(validate_color("#12345").is_err());
        assert!(validate_color("#gggggg").is_err());
    }

    #[test]
    fn month_and_year_ranges() {
        assert_eq!(validate_month(1).unwrap(), 1);
        assert_eq!(validate_month(12).unwrap(), 12);
        assert_eq!(validate_month(0).unwrap_err().code, ErrorCode::InvalidMonth);
        assert_eq!(validate_month(13).unwrap_err().code, ErrorCode::InvalidMonth);
        assert!(validate_year(2024).is_ok());
        assert_eq!(validate_year(42).unwrap_err().code, ErrorCode::InvalidYear);
    }

    #[test]
    fn amounts() {
        assert_eq!(validate_amount(0.0, "amount").unwrap(), Decimal::ZERO);
        assert!(validate_amount(-0.01, "amount").is_err());
        assert!(validate_amount(f64::NAN, "amount").is_err());
        assert!(validate_amount(f64::INFINITY, "amount").is_err());
        assert!(validate_amount(MAX_AMOUNT + 1.0, "amount").is_err());
        assert_eq!(
            validate_positive_amount(0.0, "amount").unwrap_err().code,
            ErrorCode::InvalidAmount
        );
        assert!(validate_positive_amount(12.5, "amount").is_ok());
    }
}
