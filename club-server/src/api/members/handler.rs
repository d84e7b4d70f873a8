//! Member API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use shared::models::{Member, RosterSyncReport};

use crate::audit_log;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::member;
use crate::services::{ensure_member, roster};
use crate::utils::AppResult;

pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Member>>> {
    let members = member::find_all(&state.pool).await?;
    Ok(Json(members))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Member>> {
    let found = ensure_member(&state.pool, id).await?;
    Ok(Json(found))
}

pub async fn sync(
    State(state): State<ServerState>,
    Extension(operator): Extension<CurrentUser>,
) -> AppResult<Json<RosterSyncReport>> {
    let report = roster::sync(&state.pool).await?;

    if !report.is_empty() {
        let details = format!(
            "created={} renamed={} unlinked={} removed={}",
            report.created.len(),
            report.renamed.len(),
            report.unlinked.len(),
            report.removed.len()
        );
        audit_log!(operator.id, "sync", "members", details.as_str());
    }

    Ok(Json(report))
}

/// Delete an unlinked member together with its dues
pub async fn delete(
    State(state): State<ServerState>,
    Extension(operator): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Member>> {
    let removed = roster::delete_member(&state.pool, id).await?;

    let resource = format!("member:{id}");
    audit_log!(operator.id, "delete", resource.as_str(), removed.name.as_str());

    Ok(Json(removed))
}
