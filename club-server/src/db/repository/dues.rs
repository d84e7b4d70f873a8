//! Dues Repository
//!
//! One row per member and year; the twelve months live in a JSON column.

use super::RepoResult;
use shared::models::DuesData;
use sqlx::SqliteExecutor;
use sqlx::types::Json;

const DUES_SELECT: &str = "SELECT member_id, year, months, unpaid_amount, updated_at FROM dues";

pub async fn find(
    db: impl SqliteExecutor<'_>,
    member_id: i64,
    year: i32,
) -> RepoResult<Option<DuesData>> {
    let sql = format!("{DUES_SELECT} WHERE member_id = ? AND year = ?");
    let row = sqlx::query_as::<_, DuesData>(&sql)
        .bind(member_id)
        .bind(year)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn find_by_year(db: impl SqliteExecutor<'_>, year: i32) -> RepoResult<Vec<DuesData>> {
    let sql = format!("{DUES_SELECT} WHERE year = ?");
    let rows = sqlx::query_as::<_, DuesData>(&sql)
        .bind(year)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

/// Dues record of `year` whose months reference `income_id`
pub async fn find_by_income(
    db: impl SqliteExecutor<'_>,
    year: i32,
    income_id: i64,
) -> RepoResult<Option<DuesData>> {
    let sql = format!(
        "{DUES_SELECT} WHERE year = ?1 AND EXISTS (SELECT 1 FROM json_each(dues.months) WHERE json_extract(json_each.value, '$.income_id') = ?2)"
    );
    let row = sqlx::query_as::<_, DuesData>(&sql)
        .bind(year)
        .bind(income_id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

/// Insert or replace the record; stamps `updated_at`
pub async fn upsert(db: impl SqliteExecutor<'_>, dues: &mut DuesData) -> RepoResult<()> {
    dues.updated_at = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO dues (member_id, year, months, unpaid_amount, updated_at) VALUES (?1, ?2, ?3, ?4, ?5) ON CONFLICT(member_id, year) DO UPDATE SET months = excluded.months, unpaid_amount = excluded.unpaid_amount, updated_at = excluded.updated_at",
    )
    .bind(dues.member_id)
    .bind(dues.year)
    .bind(Json(&dues.months))
    .bind(dues.unpaid_amount)
    .bind(dues.updated_at)
    .execute(db)
    .await?;
    Ok(())
}
