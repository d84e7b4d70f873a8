//! Expense Repository

use super::RepoResult;
use shared::models::{Expense, LedgerFilter};
use sqlx::SqliteExecutor;

const EXPENSE_SELECT: &str = "SELECT id, date, year, month, category, amount, note, member_id, created_at, updated_at FROM expense";

pub async fn find_all(db: impl SqliteExecutor<'_>, filter: &LedgerFilter) -> RepoResult<Vec<Expense>> {
    let sql = format!(
        "{EXPENSE_SELECT} WHERE (?1 IS NULL OR year = ?1) AND (?2 IS NULL OR month = ?2) AND (?3 IS NULL OR member_id = ?3) ORDER BY date, created_at"
    );
    let rows = sqlx::query_as::<_, Expense>(&sql)
        .bind(filter.year)
        .bind(filter.month)
        .bind(filter.member_id)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Expense>> {
    let sql = format!("{EXPENSE_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Expense>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn insert(db: impl SqliteExecutor<'_>, expense: &Expense) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO expense (id, date, year, month, category, amount, note, member_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )
    .bind(expense.id)
    .bind(&expense.date)
    .bind(expense.year)
    .bind(expense.month)
    .bind(&expense.category)
    .bind(expense.amount)
    .bind(&expense.note)
    .bind(expense.member_id)
    .bind(expense.created_at)
    .bind(expense.updated_at)
    .execute(db)
    .await?;
    Ok(())
}

/// Write back every mutable column of an expense
pub async fn update(db: impl SqliteExecutor<'_>, expense: &Expense) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE expense SET date = ?1, year = ?2, month = ?3, category = ?4, amount = ?5, note = ?6, member_id = ?7, updated_at = ?8 WHERE id = ?9",
    )
    .bind(&expense.date)
    .bind(expense.year)
    .bind(expense.month)
    .bind(&expense.category)
    .bind(expense.amount)
    .bind(&expense.note)
    .bind(expense.member_id)
    .bind(expense.updated_at)
    .bind(expense.id)
    .execute(db)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn delete(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM expense WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// (year, month, amount) of every expense owned by `from_year` or later
pub async fn amounts_since(
    db: impl SqliteExecutor<'_>,
    from_year: i32,
) -> RepoResult<Vec<(i32, u32, f64)>> {
    let rows = sqlx::query_as::<_, (i32, u32, f64)>(
        "SELECT year, month, amount FROM expense WHERE year >= ?",
    )
    .bind(from_year)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
