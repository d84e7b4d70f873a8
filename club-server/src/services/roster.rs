//! User management and roster sync
//!
//! Every user write re-runs the roster plan inside the same transaction so
//! the member table never drifts from the users.

use std::collections::HashSet;

use shared::models::{Member, RosterSyncReport, User, UserCreate, UserRole, UserUpdate};
use sqlx::{SqliteConnection, SqlitePool};

use super::{begin, commit};
use crate::auth::{CurrentUser, credential};
use crate::core::BootstrapAdmin;
use crate::db::repository::{member, user};
use crate::ledger::roster::plan_roster_sync;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_PASSWORD_LEN, validate_optional_text, validate_required_text,
    validate_username,
};
use crate::utils::{AppError, AppResult, ErrorCode};

fn user_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::UserNotFound, format!("User {id} not found"))
        .with_detail("user_id", id)
}

/// Plan and apply a roster sync against `users`
async fn apply_sync(conn: &mut SqliteConnection, users: &[User]) -> AppResult<RosterSyncReport> {
    let members = member::find_all(&mut *conn).await?;
    let with_dues: HashSet<i64> = member::ids_with_dues(&mut *conn)
        .await?
        .into_iter()
        .collect();
    let plan = plan_roster_sync(users, &members, &with_dues);

    let mut report = RosterSyncReport::default();
    if plan.is_empty() {
        return Ok(report);
    }

    let now = shared::util::now_millis();
    for (user_id, name) in plan.create {
        let m = Member {
            id: shared::util::snowflake_id(),
            user_id: Some(user_id),
            name,
            created_at: now,
            updated_at: now,
        };
        member::insert(&mut *conn, &m).await?;
        report.created.push(m.id);
    }
    for (member_id, name) in plan.rename {
        member::rename(&mut *conn, member_id, &name).await?;
        report.renamed.push(member_id);
    }
    for member_id in plan.unlink {
        member::unlink(&mut *conn, member_id).await?;
        report.unlinked.push(member_id);
    }
    for member_id in plan.remove {
        member::delete(&mut *conn, member_id).await?;
        report.removed.push(member_id);
    }

    tracing::info!(
        created = report.created.len(),
        renamed = report.renamed.len(),
        unlinked = report.unlinked.len(),
        removed = report.removed.len(),
        "Roster synced"
    );
    Ok(report)
}

/// Reconcile the member table with the current users
pub async fn sync(pool: &SqlitePool) -> AppResult<RosterSyncReport> {
    let mut tx = begin(pool).await?;
    let users = user::find_all(&mut *tx).await?;
    let report = apply_sync(&mut tx, &users).await?;
    commit(tx).await?;
    Ok(report)
}

/// Create a user together with its member
pub async fn create_user(pool: &SqlitePool, data: UserCreate) -> AppResult<User> {
    validate_username(&data.username)?;
    validate_required_text(&data.display_name, "display_name", MAX_NAME_LEN)?;
    validate_required_text(&data.password, "password", MAX_PASSWORD_LEN)?;

    let mut tx = begin(pool).await?;
    if user::find_by_username(&mut *tx, &data.username)
        .await?
        .is_some()
    {
        return Err(AppError::with_message(
            ErrorCode::UsernameExists,
            format!("Username {} already exists", data.username),
        )
        .with_detail("username", data.username));
    }

    let now = shared::util::now_millis();
    let new_user = User {
        id: shared::util::snowflake_id(),
        username: data.username.trim().to_string(),
        display_name: data.display_name.trim().to_string(),
        role: data.role,
        credential_hash: credential::hash(&data.password)?,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    user::insert(&mut *tx, &new_user).await?;

    let users = user::find_all(&mut *tx).await?;
    apply_sync(&mut tx, &users).await?;
    commit(tx).await?;

    tracing::info!(user_id = new_user.id, username = %new_user.username, role = %new_user.role, "User created");
    Ok(new_user)
}

/// Update a user; renames follow into the roster
///
/// The last active admin cannot be demoted or deactivated.
pub async fn update_user(pool: &SqlitePool, id: i64, data: UserUpdate) -> AppResult<User> {
    if let Some(name) = &data.display_name {
        validate_required_text(name, "display_name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&data.password, "password", MAX_PASSWORD_LEN)?;
    if data.password.as_deref().is_some_and(|p| p.trim().is_empty()) {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            "password must not be empty",
        ));
    }

    let mut tx = begin(pool).await?;
    let existing = user::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| user_not_found(id))?;

    let loses_admin = existing.role == UserRole::Admin
        && existing.is_active
        && (data.role.is_some_and(|r| r != UserRole::Admin) || data.is_active == Some(false));
    if loses_admin && user::count_other_active_admins(&mut *tx, id).await? == 0 {
        return Err(AppError::with_message(
            ErrorCode::CannotModifyAdmin,
            "Cannot demote or deactivate the last active admin",
        ));
    }

    let credential_hash = data.password.as_deref().map(credential::hash).transpose()?;
    let data = UserUpdate {
        display_name: data.display_name.map(|n| n.trim().to_string()),
        ..data
    };
    user::update(&mut *tx, id, &data, credential_hash.as_deref()).await?;

    let users = user::find_all(&mut *tx).await?;
    apply_sync(&mut tx, &users).await?;
    commit(tx).await?;

    user::find_by_id(pool, id)
        .await?
        .ok_or_else(|| user_not_found(id))
}

/// Delete a user; its member is unlinked (dues history) or removed
pub async fn delete_user(
    pool: &SqlitePool,
    id: i64,
    operator: &CurrentUser,
) -> AppResult<RosterSyncReport> {
    if id == operator.id {
        return Err(AppError::new(ErrorCode::CannotDeleteSelf));
    }

    let mut tx = begin(pool).await?;
    let existing = user::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| user_not_found(id))?;
    if existing.role == UserRole::Admin
        && existing.is_active
        && user::count_other_active_admins(&mut *tx, id).await? == 0
    {
        return Err(AppError::with_message(
            ErrorCode::CannotDeleteAdmin,
            "Cannot delete the last active admin",
        ));
    }

    // reconcile against the remaining users before the row goes away
    let remaining: Vec<User> = user::find_all(&mut *tx)
        .await?
        .into_iter()
        .filter(|u| u.id != id)
        .collect();
    let report = apply_sync(&mut tx, &remaining).await?;
    user::delete(&mut *tx, id).await?;
    commit(tx).await?;

    tracing::info!(user_id = id, username = %existing.username, "User deleted");
    Ok(report)
}

/// Delete a member that no longer has a user, along with its dues
pub async fn delete_member(pool: &SqlitePool, id: i64) -> AppResult<Member> {
    let mut tx = begin(pool).await?;
    let existing = super::ensure_member(&mut *tx, id).await?;
    if existing.user_id.is_some() {
        return Err(AppError::with_message(
            ErrorCode::MemberHasUser,
            "Member is linked to a user; delete the user instead",
        )
        .with_detail("member_id", id));
    }
    member::delete(&mut *tx, id).await?;
    commit(tx).await?;
    Ok(existing)
}

/// Seed an admin into an empty user table
///
/// Without a configured password a random credential is stored; nothing
/// logs in with it.
pub async fn bootstrap_admin(pool: &SqlitePool, admin: &BootstrapAdmin) -> AppResult<Option<User>> {
    if user::count(pool).await? > 0 {
        return Ok(None);
    }
    let password = admin
        .password
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let created = create_user(
        pool,
        UserCreate {
            username: admin.username.clone(),
            display_name: admin.display_name.clone(),
            password,
            role: UserRole::Admin,
        },
    )
    .await?;
    tracing::warn!(user_id = created.id, username = %created.username, "Bootstrap admin created");
    Ok(Some(created))
}
