//! Dues API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use shared::models::{DuesData, DuesSummary, MonthChange, UnpaidOverride};

use crate::api::YearQuery;
use crate::audit_log;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::dues;
use crate::utils::AppResult;
use crate::utils::time::current_year;

/// Every member's dues for a year (current year by default)
pub async fn overview(
    State(state): State<ServerState>,
    Query(query): Query<YearQuery>,
) -> AppResult<Json<Vec<DuesSummary>>> {
    let year = query.year.unwrap_or_else(current_year);
    let rows = dues::overview(&state.pool, year, state.monthly_fee()).await?;
    Ok(Json(rows))
}

/// Dues of one member; missing years come back fresh and unsaved
pub async fn get(
    State(state): State<ServerState>,
    Path((member_id, year)): Path<(i64, i32)>,
) -> AppResult<Json<DuesData>> {
    let data = dues::get(&state.pool, member_id, year, state.monthly_fee()).await?;
    Ok(Json(data))
}

pub async fn update_month(
    State(state): State<ServerState>,
    Extension(operator): Extension<CurrentUser>,
    Path((member_id, year, month)): Path<(i64, i32, u32)>,
    Json(change): Json<MonthChange>,
) -> AppResult<Json<DuesData>> {
    let data = dues::update_month(
        &state.pool,
        member_id,
        year,
        month,
        change,
        state.monthly_fee(),
    )
    .await?;

    let resource = format!("dues:{member_id}/{year}-{month:02}");
    if let Some(m) = data.months.iter().find(|m| m.month == month) {
        let details = format!("status={:?} amount={:.2}", m.status, m.amount);
        audit_log!(operator.id, "update_month", resource.as_str(), details.as_str());
    }

    Ok(Json(data))
}

pub async fn override_unpaid(
    State(state): State<ServerState>,
    Extension(operator): Extension<CurrentUser>,
    Path((member_id, year)): Path<(i64, i32)>,
    Json(payload): Json<UnpaidOverride>,
) -> AppResult<Json<DuesData>> {
    let data = dues::override_unpaid(
        &state.pool,
        member_id,
        year,
        payload.unpaid_amount,
        state.monthly_fee(),
    )
    .await?;

    let resource = format!("dues:{member_id}/{year}");
    let details = format!("unpaid_amount={:.2}", data.unpaid_amount);
    audit_log!(operator.id, "override_unpaid", resource.as_str(), details.as_str());

    Ok(Json(data))
}

pub async fn recalculate(
    State(state): State<ServerState>,
    Extension(operator): Extension<CurrentUser>,
    Path((member_id, year)): Path<(i64, i32)>,
) -> AppResult<Json<DuesData>> {
    let data = dues::recalculate(&state.pool, member_id, year, state.monthly_fee()).await?;

    let resource = format!("dues:{member_id}/{year}");
    let details = format!("unpaid_amount={:.2}", data.unpaid_amount);
    audit_log!(operator.id, "recalculate", resource.as_str(), details.as_str());

    Ok(Json(data))
}
