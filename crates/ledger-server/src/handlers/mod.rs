//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

use axum::{body::Bytes, extract::Request, Json};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::AppError;
use ledger_core::Category;

pub mod budgets;
pub mod reports;
pub mod transactions;

// Re-export all handlers for use in router
pub use budgets::*;
pub use reports::*;
pub use transactions::*;

/// Largest accepted JSON request body
const MAX_BODY_BYTES: usize = 16 * 1024;

/// Read a JSON request body, rejecting oversized or malformed payloads
pub(crate) async fn read_json<T: DeserializeOwned>(request: Request) -> Result<T, AppError> {
    let bytes: Bytes = axum::body::to_bytes(request.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|_| AppError::bad_request("Invalid request body"))?;
    serde_json::from_slice(&bytes).map_err(|_| AppError::bad_request("Invalid JSON"))
}

/// Fallback for verbs a resource does not support
pub async fn method_not_allowed() -> AppError {
    AppError::method_not_allowed()
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /api/health - Liveness probe
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /api/categories - The closed category set, in display order
pub async fn list_categories() -> Json<Vec<Category>> {
    Json(Category::ALL.to_vec())
}
