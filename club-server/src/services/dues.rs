//! Dues service
//!
//! Reads initialize missing years in memory only; the first write persists
//! them. Paying a month records a `dues` income in the same transaction.

use shared::models::{
    DUES_CATEGORY, DuesData, DuesSummary, Income, IncomeSource, Member, MonthChange,
};
use sqlx::{SqliteConnection, SqlitePool};

use super::{begin, commit, ensure_member};
use crate::db::repository::{RepoError, dues, income, member};
use crate::ledger::LedgerEffect;
use crate::ledger::dues::{
    apply_month_change, link_income, new_year, normalize, recalculate as recalculate_unpaid,
    summarize,
};
use crate::ledger::money::to_f64;
use crate::utils::AppResult;
use crate::utils::time::parse_date;
use crate::utils::validation::{validate_amount, validate_year};

/// Stored record or a fresh year at `monthly_fee`
async fn load(
    conn: &mut SqliteConnection,
    member_id: i64,
    year: i32,
    monthly_fee: f64,
) -> AppResult<DuesData> {
    let mut data = match dues::find(&mut *conn, member_id, year).await? {
        Some(stored) => stored,
        None => new_year(member_id, year, monthly_fee),
    };
    normalize(&mut data, monthly_fee);
    Ok(data)
}

/// Dues of one member for one year
pub async fn get(
    pool: &SqlitePool,
    member_id: i64,
    year: i32,
    monthly_fee: f64,
) -> AppResult<DuesData> {
    validate_year(year)?;
    let mut conn = pool.acquire().await.map_err(RepoError::from)?;
    ensure_member(&mut *conn, member_id).await?;
    load(&mut conn, member_id, year, monthly_fee).await
}

/// Overview of every member for one year, ordered like the roster
pub async fn overview(pool: &SqlitePool, year: i32, monthly_fee: f64) -> AppResult<Vec<DuesSummary>> {
    validate_year(year)?;
    let members = member::find_all(pool).await?;
    let mut stored = dues::find_by_year(pool, year).await?;

    let summaries = members
        .iter()
        .map(|m| {
            let mut data = match stored.iter().position(|d| d.member_id == m.id) {
                Some(idx) => stored.swap_remove(idx),
                None => new_year(m.id, year, monthly_fee),
            };
            normalize(&mut data, monthly_fee);
            summarize(&data, &m.name)
        })
        .collect();
    Ok(summaries)
}

fn dues_note(member: &Member, year: i32, month: u32) -> String {
    format!("Dues {year}-{month:02} {}", member.name)
}

/// Edit one month and mirror the payment into the income ledger
pub async fn update_month(
    pool: &SqlitePool,
    member_id: i64,
    year: i32,
    month: u32,
    change: MonthChange,
    monthly_fee: f64,
) -> AppResult<DuesData> {
    validate_year(year)?;

    let mut tx = begin(pool).await?;
    let owner = ensure_member(&mut *tx, member_id).await?;
    let mut data = load(&mut tx, member_id, year, monthly_fee).await?;

    let effect = apply_month_change(&mut data, month, &change)?;
    match effect {
        LedgerEffect::None => {}
        LedgerEffect::CreateIncome { month, amount } => {
            let paid_on = match change.paid_on.as_deref() {
                Some(date) => parse_date(date)?.format("%Y-%m-%d").to_string(),
                None => shared::util::today(),
            };
            let now = shared::util::now_millis();
            let entry = Income {
                id: shared::util::snowflake_id(),
                date: paid_on,
                year,
                month,
                category: DUES_CATEGORY.to_string(),
                amount,
                note: Some(dues_note(&owner, year, month)),
                member_id: Some(member_id),
                source: IncomeSource::Dues,
                created_at: now,
                updated_at: now,
            };
            income::insert(&mut *tx, &entry).await?;
            link_income(&mut data, month, entry.id)?;
            tracing::debug!(member_id, year, month, income_id = entry.id, "Dues income recorded");
        }
        LedgerEffect::RemoveIncome { month, income_id } => {
            income::delete(&mut *tx, income_id).await?;
            tracing::debug!(member_id, year, month, income_id, "Dues income removed");
        }
        LedgerEffect::AdjustIncome {
            month,
            income_id,
            amount,
        } => {
            income::update_amount(&mut *tx, income_id, amount).await?;
            tracing::debug!(member_id, year, month, income_id, amount, "Dues income adjusted");
        }
    }

    dues::upsert(&mut *tx, &mut data).await?;
    super::yearly::refresh_from(&mut tx, year).await?;
    commit(tx).await?;
    Ok(data)
}

/// Overwrite the running unpaid total
pub async fn override_unpaid(
    pool: &SqlitePool,
    member_id: i64,
    year: i32,
    unpaid_amount: f64,
    monthly_fee: f64,
) -> AppResult<DuesData> {
    validate_year(year)?;
    let amount = validate_amount(unpaid_amount, "unpaid_amount")?;

    let mut tx = begin(pool).await?;
    ensure_member(&mut *tx, member_id).await?;
    let mut data = load(&mut tx, member_id, year, monthly_fee).await?;
    data.unpaid_amount = to_f64(amount);
    dues::upsert(&mut *tx, &mut data).await?;
    commit(tx).await?;
    Ok(data)
}

/// Reset the unpaid total to the sum of unpaid months
pub async fn recalculate(
    pool: &SqlitePool,
    member_id: i64,
    year: i32,
    monthly_fee: f64,
) -> AppResult<DuesData> {
    validate_year(year)?;
    let mut tx = begin(pool).await?;
    ensure_member(&mut *tx, member_id).await?;
    let mut data = load(&mut tx, member_id, year, monthly_fee).await?;
    recalculate_unpaid(&mut data);
    dues::upsert(&mut *tx, &mut data).await?;
    commit(tx).await?;
    Ok(data)
}
