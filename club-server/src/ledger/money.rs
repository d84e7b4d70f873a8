//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to
//! `f64` for storage/serialization.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value)
        .map(round)
        .unwrap_or_else(|| {
            tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
            Decimal::ZERO
        })
}

/// Round to 2 decimal places, half away from zero
#[inline]
pub fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round(value).to_f64().unwrap_or_default()
}

/// Sum a sequence of f64 amounts without accumulating float error
pub fn sum<I: IntoIterator<Item = f64>>(amounts: I) -> Decimal {
    amounts.into_iter().map(to_decimal).sum()
}
