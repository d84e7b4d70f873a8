//! User API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use shared::models::{RosterSyncReport, User, UserCreate, UserUpdate};

use crate::audit_log;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::user;
use crate::services::roster;
use crate::utils::{AppError, AppResult, ErrorCode};

pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<User>>> {
    let users = user::find_all(&state.pool).await?;
    Ok(Json(users))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<User>> {
    let found = user::find_by_id(&state.pool, id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::UserNotFound, format!("User {id} not found"))
    })?;
    Ok(Json(found))
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(operator): Extension<CurrentUser>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<User>> {
    let created = roster::create_user(&state.pool, payload).await?;

    let resource = format!("user:{}", created.id);
    let details = format!("username={} role={}", created.username, created.role);
    audit_log!(operator.id, "create", resource.as_str(), details.as_str());

    Ok(Json(created))
}

pub async fn update(
    State(state): State<ServerState>,
    Extension(operator): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<User>> {
    let updated = roster::update_user(&state.pool, id, payload).await?;

    let resource = format!("user:{id}");
    let details = format!("role={} active={}", updated.role, updated.is_active);
    audit_log!(operator.id, "update", resource.as_str(), details.as_str());

    Ok(Json(updated))
}

/// Delete a user; its member is unlinked or removed
pub async fn delete(
    State(state): State<ServerState>,
    Extension(operator): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<RosterSyncReport>> {
    let report = roster::delete_user(&state.pool, id, &operator).await?;

    let resource = format!("user:{id}");
    audit_log!(operator.id, "delete", resource.as_str());

    Ok(Json(report))
}
