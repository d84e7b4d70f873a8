//! Special Occasion API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use shared::models::{EventHistory, SpecialEvent, SpecialEventCreate, SpecialEventUpdate};

use crate::api::YearQuery;
use crate::audit_log;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::events;
use crate::utils::{AppError, AppResult, ErrorCode};

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<YearQuery>,
) -> AppResult<Json<Vec<SpecialEvent>>> {
    let entries = events::list(&state.pool, query.year).await?;
    Ok(Json(entries))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<SpecialEvent>> {
    let entry = events::get(&state.pool, id).await?;
    Ok(Json(entry))
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(operator): Extension<CurrentUser>,
    Json(payload): Json<SpecialEventCreate>,
) -> AppResult<Json<SpecialEvent>> {
    let entry = events::create(&state.pool, payload).await?;

    let resource = format!("event:{}", entry.id);
    let details = format!("{} {} {:.2}", entry.occasion, entry.recipient, entry.amount);
    audit_log!(operator.id, "create", resource.as_str(), details.as_str());

    Ok(Json(entry))
}

pub async fn update(
    State(state): State<ServerState>,
    Extension(operator): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<SpecialEventUpdate>,
) -> AppResult<Json<SpecialEvent>> {
    let entry = events::update(&state.pool, id, payload).await?;

    let resource = format!("event:{id}");
    audit_log!(operator.id, "update", resource.as_str());

    Ok(Json(entry))
}

pub async fn delete(
    State(state): State<ServerState>,
    Extension(operator): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<SpecialEvent>> {
    let entry = events::delete(&state.pool, id).await?;

    let resource = format!("event:{id}");
    audit_log!(operator.id, "delete", resource.as_str());

    Ok(Json(entry))
}

/// Archive and clear the live list of `?year=`
pub async fn reset(
    State(state): State<ServerState>,
    Extension(operator): Extension<CurrentUser>,
    Query(query): Query<YearQuery>,
) -> AppResult<Json<EventHistory>> {
    let year = query.year.ok_or_else(|| {
        AppError::with_message(ErrorCode::RequiredField, "year is required")
            .with_detail("field", "year")
    })?;
    let history = events::reset(&state.pool, year, operator.id).await?;

    let resource = format!("events:{year}");
    let details = format!(
        "history={} entries={} total={:.2}",
        history.id, history.entry_count, history.total_amount
    );
    audit_log!(operator.id, "reset", resource.as_str(), details.as_str());

    Ok(Json(history))
}

pub async fn history(
    State(state): State<ServerState>,
    Query(query): Query<YearQuery>,
) -> AppResult<Json<Vec<EventHistory>>> {
    let rows = events::history(&state.pool, query.year).await?;
    Ok(Json(rows))
}

pub async fn history_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<EventHistory>> {
    let row = events::history_by_id(&state.pool, id).await?;
    Ok(Json(row))
}
