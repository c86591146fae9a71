//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::read_json;
use crate::{AppError, AppState, MutationResponse};
use ledger_core::{MonthToken, Transaction, TransactionInput};

/// Optional month filter shared by list and report endpoints
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    /// Month token (YYYY-MM)
    pub month: Option<String>,
}

impl MonthQuery {
    /// Parse the month filter if one was given
    ///
    /// A blank `month=` (a cleared month picker) means no filter.
    pub fn token(&self) -> Result<Option<MonthToken>, AppError> {
        match self.month.as_deref().filter(|m| !m.trim().is_empty()) {
            Some(month) => Ok(Some(month.parse()?)),
            None => Ok(None),
        }
    }
}

/// Target of a delete request
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

impl IdQuery {
    /// The raw id, with a blank `id=` treated as omitted
    pub fn raw(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}

/// GET /api/transactions - List transactions, newest first
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MonthQuery>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let transactions = match params.token()? {
        Some(month) => state.db.list_transactions_for_month(&month)?,
        None => state.db.list_transactions()?,
    };
    Ok(Json(transactions))
}

/// POST /api/transactions - Record a transaction
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, Json<MutationResponse>), AppError> {
    let input: TransactionInput = read_json(request).await?;

    let new_tx = input.parse()?;
    new_tx.validate()?;

    let tx = state.db.insert_transaction(&new_tx)?;

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse {
            message: "Transaction added",
            id: tx.id,
        }),
    ))
}

/// DELETE /api/transactions?id= - Delete a transaction
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IdQuery>,
) -> Result<Json<MutationResponse>, AppError> {
    let raw = params
        .raw()
        .ok_or_else(|| AppError::bad_request("Transaction ID is required"))?;

    // An id that can't name a row is treated like one that doesn't exist
    let id: i64 = raw
        .parse()
        .map_err(|_| AppError::not_found("Transaction not found"))?;

    let id = state.db.delete_transaction(id)?;

    Ok(Json(MutationResponse {
        message: "Transaction deleted",
        id,
    }))
}
