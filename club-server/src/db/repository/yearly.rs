//! Yearly Balance Repository

use super::RepoResult;
use shared::models::YearlyData;
use sqlx::SqliteExecutor;
use sqlx::types::Json;

const YEARLY_SELECT: &str = "SELECT year, opening_balance, opening_is_manual, months, total_income, total_expense, closing_balance, updated_at FROM yearly";

pub async fn find_all(db: impl SqliteExecutor<'_>) -> RepoResult<Vec<YearlyData>> {
    let sql = format!("{YEARLY_SELECT} ORDER BY year");
    let rows = sqlx::query_as::<_, YearlyData>(&sql).fetch_all(db).await?;
    Ok(rows)
}

pub async fn find(db: impl SqliteExecutor<'_>, year: i32) -> RepoResult<Option<YearlyData>> {
    let sql = format!("{YEARLY_SELECT} WHERE year = ?");
    let row = sqlx::query_as::<_, YearlyData>(&sql)
        .bind(year)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

/// Smallest and largest year known to the yearly table or either ledger
pub async fn tracked_range(db: impl SqliteExecutor<'_>) -> RepoResult<Option<(i32, i32)>> {
    let (min, max) = sqlx::query_as::<_, (Option<i32>, Option<i32>)>(
        "SELECT MIN(year), MAX(year) FROM (SELECT year FROM yearly UNION ALL SELECT year FROM income UNION ALL SELECT year FROM expense)",
    )
    .fetch_one(db)
    .await?;
    Ok(min.zip(max))
}

pub async fn upsert(db: impl SqliteExecutor<'_>, data: &YearlyData) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO yearly (year, opening_balance, opening_is_manual, months, total_income, total_expense, closing_balance, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) ON CONFLICT(year) DO UPDATE SET opening_balance = excluded.opening_balance, opening_is_manual = excluded.opening_is_manual, months = excluded.months, total_income = excluded.total_income, total_expense = excluded.total_expense, closing_balance = excluded.closing_balance, updated_at = excluded.updated_at",
    )
    .bind(data.year)
    .bind(data.opening_balance)
    .bind(data.opening_is_manual)
    .bind(Json(&data.months))
    .bind(data.total_income)
    .bind(data.total_expense)
    .bind(data.closing_balance)
    .bind(data.updated_at)
    .execute(db)
    .await?;
    Ok(())
}
