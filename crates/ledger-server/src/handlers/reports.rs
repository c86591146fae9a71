//! Report handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use super::transactions::MonthQuery;
use crate::{AppError, AppState};
use ledger_core::{
    aggregate::{daily_stacked_series, RECENT_TRANSACTIONS},
    Category, DailySpending, MonthlyBudgetReport, SpendingSummary, Transaction,
};

/// Transactions for the requested month, or all of them
fn scoped_transactions(
    state: &AppState,
    params: &MonthQuery,
) -> Result<Vec<Transaction>, AppError> {
    Ok(match params.token()? {
        Some(month) => state.db.list_transactions_for_month(&month)?,
        None => state.db.list_transactions()?,
    })
}

/// GET /api/reports/budget?month= - Budget vs. actual with insights
pub async fn report_budget(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MonthQuery>,
) -> Result<Json<MonthlyBudgetReport>, AppError> {
    let month = params
        .token()?
        .ok_or_else(|| AppError::bad_request("month is required (YYYY-MM)"))?;

    let transactions = state.db.list_transactions_for_month(&month)?;
    let budgets = state.db.list_budgets(Some(&month))?;

    Ok(Json(MonthlyBudgetReport::build(month, &transactions, &budgets)))
}

/// GET /api/reports/summary - Dashboard totals, pie chart and recent activity
pub async fn report_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MonthQuery>,
) -> Result<Json<SpendingSummary>, AppError> {
    let transactions = scoped_transactions(&state, &params)?;
    Ok(Json(SpendingSummary::build(&transactions, RECENT_TRANSACTIONS)))
}

/// GET /api/reports/daily - Stacked daily spending by category
pub async fn report_daily(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MonthQuery>,
) -> Result<Json<Vec<DailySpending>>, AppError> {
    let transactions = scoped_transactions(&state, &params)?;
    Ok(Json(daily_stacked_series(&transactions, &Category::ALL)))
}
