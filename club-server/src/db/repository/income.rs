//! Income Repository

use super::RepoResult;
use shared::models::{Income, LedgerFilter};
use sqlx::SqliteExecutor;

const INCOME_SELECT: &str = "SELECT id, date, year, month, category, amount, note, member_id, source, created_at, updated_at FROM income";

pub async fn find_all(db: impl SqliteExecutor<'_>, filter: &LedgerFilter) -> RepoResult<Vec<Income>> {
    let sql = format!(
        "{INCOME_SELECT} WHERE (?1 IS NULL OR year = ?1) AND (?2 IS NULL OR month = ?2) AND (?3 IS NULL OR member_id = ?3) ORDER BY date, created_at"
    );
    let rows = sqlx::query_as::<_, Income>(&sql)
        .bind(filter.year)
        .bind(filter.month)
        .bind(filter.member_id)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Income>> {
    let sql = format!("{INCOME_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Income>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn insert(db: impl SqliteExecutor<'_>, income: &Income) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO income (id, date, year, month, category, amount, note, member_id, source, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )
    .bind(income.id)
    .bind(&income.date)
    .bind(income.year)
    .bind(income.month)
    .bind(&income.category)
    .bind(income.amount)
    .bind(&income.note)
    .bind(income.member_id)
    .bind(income.source)
    .bind(income.created_at)
    .bind(income.updated_at)
    .execute(db)
    .await?;
    Ok(())
}

/// Write back every mutable column of an income
pub async fn update(db: impl SqliteExecutor<'_>, income: &Income) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE income SET date = ?1, year = ?2, month = ?3, category = ?4, amount = ?5, note = ?6, member_id = ?7, updated_at = ?8 WHERE id = ?9",
    )
    .bind(&income.date)
    .bind(income.year)
    .bind(income.month)
    .bind(&income.category)
    .bind(income.amount)
    .bind(&income.note)
    .bind(income.member_id)
    .bind(income.updated_at)
    .bind(income.id)
    .execute(db)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn update_amount(db: impl SqliteExecutor<'_>, id: i64, amount: f64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE income SET amount = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(amount)
        .bind(now)
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn delete(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM income WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// (year, month, amount) of every income owned by `from_year` or later
pub async fn amounts_since(
    db: impl SqliteExecutor<'_>,
    from_year: i32,
) -> RepoResult<Vec<(i32, u32, f64)>> {
    let rows = sqlx::query_as::<_, (i32, u32, f64)>(
        "SELECT year, month, amount FROM income WHERE year >= ?",
    )
    .bind(from_year)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
