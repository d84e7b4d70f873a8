//! Special Occasion Repository
//!
//! Live payout list plus its archived snapshots.

use super::RepoResult;
use shared::models::{EventHistory, SpecialEvent};
use sqlx::SqliteExecutor;
use sqlx::types::Json;

const EVENT_SELECT: &str = "SELECT id, year, member_id, recipient, occasion, amount, date, note, created_at, updated_at FROM special_event";

const HISTORY_SELECT: &str = "SELECT id, year, archived_at, archived_by, entry_count, total_amount, entries FROM event_history";

pub async fn find_all(
    db: impl SqliteExecutor<'_>,
    year: Option<i32>,
) -> RepoResult<Vec<SpecialEvent>> {
    let sql = format!("{EVENT_SELECT} WHERE (?1 IS NULL OR year = ?1) ORDER BY date, created_at");
    let rows = sqlx::query_as::<_, SpecialEvent>(&sql)
        .bind(year)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<SpecialEvent>> {
    let sql = format!("{EVENT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, SpecialEvent>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn insert(db: impl SqliteExecutor<'_>, event: &SpecialEvent) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO special_event (id, year, member_id, recipient, occasion, amount, date, note, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )
    .bind(event.id)
    .bind(event.year)
    .bind(event.member_id)
    .bind(&event.recipient)
    .bind(&event.occasion)
    .bind(event.amount)
    .bind(&event.date)
    .bind(&event.note)
    .bind(event.created_at)
    .bind(event.updated_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn update(db: impl SqliteExecutor<'_>, event: &SpecialEvent) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE special_event SET year = ?1, member_id = ?2, recipient = ?3, occasion = ?4, amount = ?5, date = ?6, note = ?7, updated_at = ?8 WHERE id = ?9",
    )
    .bind(event.year)
    .bind(event.member_id)
    .bind(&event.recipient)
    .bind(&event.occasion)
    .bind(event.amount)
    .bind(&event.date)
    .bind(&event.note)
    .bind(event.updated_at)
    .bind(event.id)
    .execute(db)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn delete(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM special_event WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn delete_by_year(db: impl SqliteExecutor<'_>, year: i32) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM special_event WHERE year = ?")
        .bind(year)
        .execute(db)
        .await?;
    Ok(rows.rows_affected())
}

// ── History ─────────────────────────────────────────────────────────

pub async fn insert_history(db: impl SqliteExecutor<'_>, history: &EventHistory) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO event_history (id, year, archived_at, archived_by, entry_count, total_amount, entries) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(history.id)
    .bind(history.year)
    .bind(history.archived_at)
    .bind(history.archived_by)
    .bind(history.entry_count)
    .bind(history.total_amount)
    .bind(Json(&history.entries))
    .execute(db)
    .await?;
    Ok(())
}

pub async fn find_history(
    db: impl SqliteExecutor<'_>,
    year: Option<i32>,
) -> RepoResult<Vec<EventHistory>> {
    let sql = format!("{HISTORY_SELECT} WHERE (?1 IS NULL OR year = ?1) ORDER BY archived_at DESC");
    let rows = sqlx::query_as::<_, EventHistory>(&sql)
        .bind(year)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

pub async fn find_history_by_id(
    db: impl SqliteExecutor<'_>,
    id: i64,
) -> RepoResult<Option<EventHistory>> {
    let sql = format!("{HISTORY_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, EventHistory>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}
