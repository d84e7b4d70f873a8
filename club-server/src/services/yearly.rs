//! Yearly balance maintenance
//!
//! [`refresh_from`] recomputes a year and every later tracked year. Ledger
//! and dues writes call it inside their own transaction.

use std::collections::BTreeMap;

use shared::models::YearlyData;
use sqlx::{SqliteConnection, SqlitePool};

use super::{begin, commit};
use crate::db::repository::{expense, income, yearly};
use crate::ledger::money::{to_decimal, to_f64};
use crate::ledger::rollup::{YearAmounts, build_year, month_totals, roll_forward};
use crate::utils::validation::{MAX_AMOUNT, validate_year};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Recompute `year` and every later tracked year
///
/// Falls back to the earliest tracked year when `year - 1` has no stored
/// row, so the chain stays contiguous. Returns the rewritten years.
pub async fn refresh_from(conn: &mut SqliteConnection, year: i32) -> AppResult<Vec<YearlyData>> {
    let (first, last) = match yearly::tracked_range(&mut *conn).await? {
        Some((f, l)) => (f.min(year), l.max(year)),
        None => (year, year),
    };

    let previous = if year > first {
        yearly::find(&mut *conn, year - 1).await?
    } else {
        None
    };
    let (start, opening, manual) = match previous {
        Some(prev) => (year, prev.closing_balance, false),
        None => match yearly::find(&mut *conn, first).await? {
            Some(row) if row.opening_is_manual => (first, row.opening_balance, true),
            _ => (first, 0.0, false),
        },
    };

    let mut years: BTreeMap<i32, YearAmounts> =
        (start..=last).map(|y| (y, YearAmounts::default())).collect();
    for (y, month, amount) in income::amounts_since(&mut *conn, start).await? {
        if let Some(entry) = years.get_mut(&y) {
            entry.incomes.push((month, amount));
        }
    }
    for (y, month, amount) in expense::amounts_since(&mut *conn, start).await? {
        if let Some(entry) = years.get_mut(&y) {
            entry.expenses.push((month, amount));
        }
    }

    let years: Vec<(i32, YearAmounts)> = years.into_iter().collect();
    let chain = roll_forward(opening, manual, &years, shared::util::now_millis());
    for data in &chain {
        yearly::upsert(&mut *conn, data).await?;
    }

    tracing::debug!(from = start, to = last, "Yearly balances refreshed");
    Ok(chain)
}

/// POST refresh: recompute from `year` in its own transaction
pub async fn refresh(pool: &SqlitePool, year: i32) -> AppResult<Vec<YearlyData>> {
    validate_year(year)?;
    let mut tx = begin(pool).await?;
    let chain = refresh_from(&mut tx, year).await?;
    commit(tx).await?;
    Ok(chain)
}

/// Set the opening balance of the earliest tracked year
///
/// Later years always open with the previous closing balance. Setting an
/// earlier year than any tracked one makes it the new earliest year.
pub async fn set_opening_balance(pool: &SqlitePool, year: i32, amount: f64) -> AppResult<YearlyData> {
    validate_year(year)?;
    if !amount.is_finite() || amount.abs() > MAX_AMOUNT {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!("opening_balance must be a finite number within ±{MAX_AMOUNT}"),
        ));
    }

    let mut tx = begin(pool).await?;
    if let Some((first, _)) = yearly::tracked_range(&mut *tx).await?
        && year > first
    {
        return Err(AppError::with_message(
            ErrorCode::OpeningBalanceCarried,
            format!("Opening balance of {year} is carried from {}", year - 1),
        )
        .with_detail("earliest_year", first));
    }

    let now = shared::util::now_millis();
    let seed = build_year(
        year,
        to_f64(to_decimal(amount)),
        true,
        month_totals(&[], &[]),
        now,
    );
    yearly::upsert(&mut *tx, &seed).await?;
    let chain = refresh_from(&mut tx, year).await?;
    commit(tx).await?;

    chain
        .into_iter()
        .find(|y| y.year == year)
        .ok_or_else(|| AppError::internal(format!("Year {year} missing after refresh")))
}

pub async fn list(pool: &SqlitePool) -> AppResult<Vec<YearlyData>> {
    Ok(yearly::find_all(pool).await?)
}

pub async fn get(pool: &SqlitePool, year: i32) -> AppResult<YearlyData> {
    yearly::find(pool, year).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::YearlyNotFound, format!("No balance for {year}"))
            .with_detail("year", year)
    })
}
