//! Services - load, reconcile, write back
//!
//! Each write runs in one SQLite transaction: load the records, call the
//! pure core in [`crate::ledger`], apply its effects, refresh the yearly
//! rollup, commit.

pub mod dues;
pub mod events;
pub mod ledger;
pub mod roster;
pub mod yearly;

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::db::repository::{RepoError, member};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Begin a transaction, mapping pool errors to [`AppError`]
pub(crate) async fn begin(pool: &SqlitePool) -> AppResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin().await.map_err(RepoError::from)?)
}

pub(crate) async fn commit(tx: Transaction<'static, Sqlite>) -> AppResult<()> {
    Ok(tx.commit().await.map_err(RepoError::from)?)
}

/// Fail with `MemberNotFound` unless the member exists
pub(crate) async fn ensure_member(
    db: impl sqlx::SqliteExecutor<'_>,
    member_id: i64,
) -> AppResult<shared::models::Member> {
    member::find_by_id(db, member_id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::MemberNotFound, format!("Member {member_id} not found"))
            .with_detail("member_id", member_id)
    })
}
