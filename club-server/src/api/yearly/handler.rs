//! Yearly Balance API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use shared::models::{OpeningBalanceUpdate, YearlyData};

use crate::audit_log;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::yearly;
use crate::utils::AppResult;

pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<YearlyData>>> {
    let years = yearly::list(&state.pool).await?;
    Ok(Json(years))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(year): Path<i32>,
) -> AppResult<Json<YearlyData>> {
    let data = yearly::get(&state.pool, year).await?;
    Ok(Json(data))
}

/// Only the earliest tracked year takes a manual opening balance
pub async fn set_opening_balance(
    State(state): State<ServerState>,
    Extension(operator): Extension<CurrentUser>,
    Path(year): Path<i32>,
    Json(payload): Json<OpeningBalanceUpdate>,
) -> AppResult<Json<YearlyData>> {
    let data = yearly::set_opening_balance(&state.pool, year, payload.opening_balance).await?;

    let resource = format!("yearly:{year}");
    let details = format!("opening_balance={:.2}", data.opening_balance);
    audit_log!(operator.id, "set_opening", resource.as_str(), details.as_str());

    Ok(Json(data))
}

/// Recompute `year` and every later year
pub async fn refresh(
    State(state): State<ServerState>,
    Path(year): Path<i32>,
) -> AppResult<Json<Vec<YearlyData>>> {
    let chain = yearly::refresh(&state.pool, year).await?;
    Ok(Json(chain))
}
