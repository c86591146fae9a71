//! Budget handlers

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    Json,
};

use super::read_json;
use super::transactions::{IdQuery, MonthQuery};
use crate::{AppError, AppState, MutationResponse};
use ledger_core::{Budget, BudgetInput, BudgetUpsert};

/// GET /api/budgets - List budgets, optionally for one month
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MonthQuery>,
) -> Result<Json<Vec<Budget>>, AppError> {
    let month = params.token()?;
    let budgets = state.db.list_budgets(month.as_ref())?;
    Ok(Json(budgets))
}

/// POST /api/budgets - Create or update the budget for a (month, category) pair
pub async fn save_budget(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, Json<MutationResponse>), AppError> {
    let input: BudgetInput = read_json(request).await?;

    let new_budget = input.parse()?;
    new_budget.validate()?;

    let response = match state.db.upsert_budget(&new_budget)? {
        BudgetUpsert::Created(budget) => (
            StatusCode::CREATED,
            Json(MutationResponse {
                message: "Budget added",
                id: budget.id,
            }),
        ),
        BudgetUpsert::Updated(budget) => (
            StatusCode::OK,
            Json(MutationResponse {
                message: "Budget updated",
                id: budget.id,
            }),
        ),
    };

    Ok(response)
}

/// DELETE /api/budgets?id= - Delete a budget
pub async fn delete_budget(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IdQuery>,
) -> Result<Json<MutationResponse>, AppError> {
    let raw = params
        .raw()
        .ok_or_else(|| AppError::bad_request("Budget ID is required"))?;
    let id: i64 = raw
        .parse()
        .map_err(|_| AppError::not_found("Budget not found"))?;

    let id = state.db.delete_budget(id)?;

    Ok(Json(MutationResponse {
        message: "Budget deleted",
        id,
    }))
}
