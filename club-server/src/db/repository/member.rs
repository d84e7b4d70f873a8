//! Member Repository

use super::RepoResult;
use shared::models::Member;
use sqlx::SqliteExecutor;

const MEMBER_SELECT: &str = "SELECT id, user_id, name, created_at, updated_at FROM member";

pub async fn find_all(db: impl SqliteExecutor<'_>) -> RepoResult<Vec<Member>> {
    let sql = format!("{MEMBER_SELECT} ORDER BY name COLLATE NOCASE, id");
    let rows = sqlx::query_as::<_, Member>(&sql).fetch_all(db).await?;
    Ok(rows)
}

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Member>> {
    let sql = format!("{MEMBER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Member>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn find_by_user_id(
    db: impl SqliteExecutor<'_>,
    user_id: i64,
) -> RepoResult<Option<Member>> {
    let sql = format!("{MEMBER_SELECT} WHERE user_id = ?");
    let row = sqlx::query_as::<_, Member>(&sql)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn insert(db: impl SqliteExecutor<'_>, member: &Member) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO member (id, user_id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(member.id)
    .bind(member.user_id)
    .bind(&member.name)
    .bind(member.created_at)
    .bind(member.updated_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn rename(db: impl SqliteExecutor<'_>, id: i64, name: &str) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("UPDATE member SET name = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(name)
        .bind(now)
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn unlink(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("UPDATE member SET user_id = NULL, updated_at = ?1 WHERE id = ?2")
        .bind(now)
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn delete(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM member WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Ids of members with at least one dues record
pub async fn ids_with_dues(db: impl SqliteExecutor<'_>) -> RepoResult<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>("SELECT DISTINCT member_id FROM dues")
        .fetch_all(db)
        .await?;
    Ok(ids)
}
