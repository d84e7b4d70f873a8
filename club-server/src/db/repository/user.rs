//! User Repository

use super::RepoResult;
use shared::models::{User, UserRole, UserUpdate};
use sqlx::SqliteExecutor;

const USER_SELECT: &str = "SELECT id, username, display_name, role, credential_hash, is_active, created_at, updated_at FROM user";

pub async fn find_all(db: impl SqliteExecutor<'_>) -> RepoResult<Vec<User>> {
    let sql = format!("{USER_SELECT} ORDER BY created_at, id");
    let rows = sqlx::query_as::<_, User>(&sql).fetch_all(db).await?;
    Ok(rows)
}

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn find_by_username(
    db: impl SqliteExecutor<'_>,
    username: &str,
) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE username = ? COLLATE NOCASE");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn count(db: impl SqliteExecutor<'_>) -> RepoResult<i64> {
    let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user")
        .fetch_one(db)
        .await?;
    Ok(n)
}

/// Active admins other than `exclude_id`
pub async fn count_other_active_admins(
    db: impl SqliteExecutor<'_>,
    exclude_id: i64,
) -> RepoResult<i64> {
    let n = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM user WHERE role = ? AND is_active = 1 AND id != ?",
    )
    .bind(UserRole::Admin)
    .bind(exclude_id)
    .fetch_one(db)
    .await?;
    Ok(n)
}

pub async fn insert(db: impl SqliteExecutor<'_>, user: &User) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO user (id, username, display_name, role, credential_hash, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.display_name)
    .bind(user.role)
    .bind(&user.credential_hash)
    .bind(user.is_active)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(db)
    .await?;
    Ok(())
}

/// Partial update; `data.password` is ignored in favor of `credential_hash`
pub async fn update(
    db: impl SqliteExecutor<'_>,
    id: i64,
    data: &UserUpdate,
    credential_hash: Option<&str>,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE user SET display_name = COALESCE(?1, display_name), credential_hash = COALESCE(?2, credential_hash), role = COALESCE(?3, role), is_active = COALESCE(?4, is_active), updated_at = ?5 WHERE id = ?6",
    )
    .bind(data.display_name.as_deref())
    .bind(credential_hash)
    .bind(data.role)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(db)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn delete(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM user WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}
