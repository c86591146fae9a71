//! Budget operations
//!
//! At most one budget row exists per (month, category). `upsert_budget` is the
//! only write path that callers should use for submissions; it runs the
//! lookup and the write inside one `IMMEDIATE` SQLite transaction, and the
//! `UNIQUE(month, category)` index backs it at the storage layer.

use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use tracing::{info, warn};

use super::transactions::conversion_error;
use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{parse_category, Budget, Category, NewBudget};
use crate::month::MonthToken;

const BUDGET_COLUMNS: &str = "id, month, category, amount, created_at";

/// Outcome of a budget upsert
#[derive(Debug, Clone, PartialEq)]
pub enum BudgetUpsert {
    /// No budget existed for the pair; a new row was inserted
    Created(Budget),
    /// The existing row's amount was replaced; id and created_at kept
    Updated(Budget),
}

impl BudgetUpsert {
    pub fn budget(&self) -> &Budget {
        match self {
            Self::Created(b) | Self::Updated(b) => b,
        }
    }

    pub fn into_budget(self) -> Budget {
        match self {
            Self::Created(b) | Self::Updated(b) => b,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

impl Database {
    /// List budgets for a month (or all budgets), most recently created first
    pub fn list_budgets(&self, month: Option<&MonthToken>) -> Result<Vec<Budget>> {
        let conn = self.conn()?;

        let budgets = match month {
            Some(m) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM budgets WHERE month = ? ORDER BY created_at DESC, id DESC",
                    BUDGET_COLUMNS
                ))?;
                let rows = stmt.query_map(params![m.to_string()], Self::row_to_budget)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM budgets ORDER BY created_at DESC, id DESC",
                    BUDGET_COLUMNS
                ))?;
                let rows = stmt.query_map([], Self::row_to_budget)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };

        Ok(budgets)
    }

    /// Find the budget for a (month, category) pair
    pub fn find_budget(&self, month: &MonthToken, category: Category) -> Result<Option<Budget>> {
        let conn = self.conn()?;
        Self::find_budget_with_conn(&conn, month, category)
    }

    /// Insert a new budget row
    ///
    /// Fails with a constraint error if the pair already has a budget.
    pub fn insert_budget(&self, budget: &NewBudget) -> Result<Budget> {
        let conn = self.conn()?;
        Self::insert_budget_with_conn(&conn, budget)
    }

    /// Replace the amount of an existing budget in place
    pub fn update_budget_amount(&self, existing: &Budget, amount: f64) -> Result<Budget> {
        let conn = self.conn()?;
        Self::update_budget_amount_with_conn(&conn, existing, amount)
    }

    /// Create the budget for (month, category), or replace its amount if one exists
    ///
    /// The write lock is taken before the lookup, so two concurrent upserts for
    /// the same pair cannot both observe "absent".
    pub fn upsert_budget(&self, budget: &NewBudget) -> Result<BudgetUpsert> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let result = match Self::find_budget_with_conn(&tx, &budget.month, budget.category)? {
            Some(existing) => BudgetUpsert::Updated(Self::update_budget_amount_with_conn(
                &tx,
                &existing,
                budget.amount,
            )?),
            None => BudgetUpsert::Created(Self::insert_budget_with_conn(&tx, budget)?),
        };

        tx.commit()?;

        info!(
            id = result.budget().id,
            month = %budget.month,
            category = %budget.category,
            amount = budget.amount,
            created = result.is_created(),
            "Budget saved"
        );
        Ok(result)
    }

    /// Delete a budget by ID, returning the deleted ID
    pub fn delete_budget(&self, id: i64) -> Result<i64> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM budgets WHERE id = ?", params![id])?;

        if deleted == 0 {
            warn!(id, "Delete requested for missing budget");
            return Err(Error::NotFound(format!("budget {}", id)));
        }

        info!(id, "Budget deleted");
        Ok(id)
    }

    fn find_budget_with_conn(
        conn: &Connection,
        month: &MonthToken,
        category: Category,
    ) -> Result<Option<Budget>> {
        let budget = conn
            .query_row(
                &format!(
                    "SELECT {} FROM budgets WHERE month = ? AND category = ?",
                    BUDGET_COLUMNS
                ),
                params![month.to_string(), category.as_str()],
                Self::row_to_budget,
            )
            .optional()?;
        Ok(budget)
    }

    fn get_budget_with_conn(conn: &Connection, id: i64) -> Result<Budget> {
        conn.query_row(
            &format!("SELECT {} FROM budgets WHERE id = ?", BUDGET_COLUMNS),
            params![id],
            Self::row_to_budget,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("budget {}", id)))
    }

    fn insert_budget_with_conn(conn: &Connection, budget: &NewBudget) -> Result<Budget> {
        conn.execute(
            "INSERT INTO budgets (month, category, amount) VALUES (?, ?, ?)",
            params![
                budget.month.to_string(),
                budget.category.as_str(),
                budget.amount
            ],
        )?;
        Self::get_budget_with_conn(conn, conn.last_insert_rowid())
    }

    fn update_budget_amount_with_conn(
        conn: &Connection,
        existing: &Budget,
        amount: f64,
    ) -> Result<Budget> {
        let updated = conn.execute(
            "UPDATE budgets SET amount = ? WHERE id = ?",
            params![amount, existing.id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("budget {}", existing.id)));
        }
        Self::get_budget_with_conn(conn, existing.id)
    }

    fn row_to_budget(row: &Row) -> rusqlite::Result<Budget> {
        let month_str: String = row.get(1)?;
        let category_str: String = row.get(2)?;
        let created_at_str: String = row.get(4)?;

        Ok(Budget {
            id: row.get(0)?,
            month: month_str.parse().map_err(|e| conversion_error(1, e))?,
            category: parse_category(&category_str).map_err(|e| conversion_error(2, e))?,
            amount: row.get(3)?,
            created_at: parse_datetime(&created_at_str).map_err(|e| conversion_error(4, e))?,
        })
    }
}
