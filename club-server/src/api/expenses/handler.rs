//! Expense API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use shared::models::{Expense, LedgerEntryCreate, LedgerEntryUpdate, LedgerFilter};

use crate::audit_log;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::ledger;
use crate::utils::AppResult;

pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<LedgerFilter>,
) -> AppResult<Json<Vec<Expense>>> {
    let expenses = ledger::list_expenses(&state.pool, &filter).await?;
    Ok(Json(expenses))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Expense>> {
    let expense = ledger::get_expense(&state.pool, id).await?;
    Ok(Json(expense))
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(operator): Extension<CurrentUser>,
    Json(payload): Json<LedgerEntryCreate>,
) -> AppResult<Json<Expense>> {
    let expense = ledger::create_expense(&state.pool, payload).await?;

    let resource = format!("expense:{}", expense.id);
    let details = format!(
        "{}-{:02} {} {:.2}",
        expense.year, expense.month, expense.category, expense.amount
    );
    audit_log!(operator.id, "create", resource.as_str(), details.as_str());

    Ok(Json(expense))
}

pub async fn update(
    State(state): State<ServerState>,
    Extension(operator): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<LedgerEntryUpdate>,
) -> AppResult<Json<Expense>> {
    let expense = ledger::update_expense(&state.pool, id, payload).await?;

    let resource = format!("expense:{id}");
    audit_log!(operator.id, "update", resource.as_str());

    Ok(Json(expense))
}

pub async fn delete(
    State(state): State<ServerState>,
    Extension(operator): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Expense>> {
    let expense = ledger::delete_expense(&state.pool, id).await?;

    let resource = format!("expense:{id}");
    let details = format!("{:.2}", expense.amount);
    audit_log!(operator.id, "delete", resource.as_str(), details.as_str());

    Ok(Json(expense))
}
