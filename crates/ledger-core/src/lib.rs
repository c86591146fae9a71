//! Ledger Core Library
//!
//! Shared functionality for the Ledger personal expense tracker:
//! - Month token parsing and month range resolution
//! - Closed category set and transaction/budget models
//! - Database access (SQLite with optional SQLCipher encryption)
//! - Atomic per-(month, category) budget upsert
//! - Aggregations: category totals, budget vs. actual, insights, chart series

pub mod aggregate;
pub mod db;
pub mod error;
pub mod models;
pub mod month;

/// Ephemeral databases for tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::{
    BudgetComparison, DailySpending, MonthlyBudgetReport, PieSlice, SpendingSummary,
};
pub use db::{BudgetUpsert, Database};
pub use error::{Error, Result};
pub use models::{
    Budget, BudgetInput, Category, NewBudget, NewTransaction, Transaction, TransactionInput,
};
pub use month::{resolve_month, MonthRange, MonthToken};
