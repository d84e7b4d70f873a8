//! Income API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use shared::models::{Income, LedgerEntryCreate, LedgerEntryUpdate, LedgerFilter};

use crate::audit_log;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::ledger;
use crate::utils::AppResult;

/// List incomes, optionally filtered by owning year/month and member
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<LedgerFilter>,
) -> AppResult<Json<Vec<Income>>> {
    let incomes = ledger::list_incomes(&state.pool, &filter).await?;
    Ok(Json(incomes))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Income>> {
    let income = ledger::get_income(&state.pool, id).await?;
    Ok(Json(income))
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(operator): Extension<CurrentUser>,
    Json(payload): Json<LedgerEntryCreate>,
) -> AppResult<Json<Income>> {
    let income = ledger::create_income(&state.pool, payload).await?;

    let resource = format!("income:{}", income.id);
    let details = format!(
        "{}-{:02} {} {:.2}",
        income.year, income.month, income.category, income.amount
    );
    audit_log!(operator.id, "create", resource.as_str(), details.as_str());

    Ok(Json(income))
}

pub async fn update(
    State(state): State<ServerState>,
    Extension(operator): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<LedgerEntryUpdate>,
) -> AppResult<Json<Income>> {
    let income = ledger::update_income(&state.pool, id, payload).await?;

    let resource = format!("income:{id}");
    let details = format!(
        "{}-{:02} {} {:.2}",
        income.year, income.month, income.category, income.amount
    );
    audit_log!(operator.id, "update", resource.as_str(), details.as_str());

    Ok(Json(income))
}

/// Delete an income; returns the removed entry
pub async fn delete(
    State(state): State<ServerState>,
    Extension(operator): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Income>> {
    let income = ledger::delete_income(&state.pool, id).await?;

    let resource = format!("income:{id}");
    let details = format!("{:.2}", income.amount);
    audit_log!(operator.id, "delete", resource.as_str(), details.as_str());

    Ok(Json(income))
}
