//! Transaction operations

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{info, warn};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{parse_category, parse_date, NewTransaction, Transaction};
use crate::month::{MonthRange, MonthToken};

const TRANSACTION_COLUMNS: &str = "id, date, category, description, amount, created_at";

/// Newest first; rows created in the same instant fall back to insertion order
const TRANSACTION_ORDER: &str = "ORDER BY created_at DESC, id DESC";

impl Database {
    /// List every transaction, most recently created first
    pub fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions {}",
            TRANSACTION_COLUMNS, TRANSACTION_ORDER
        ))?;

        let rows = stmt.query_map([], Self::row_to_transaction)?;
        let transactions = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(transactions)
    }

    /// List transactions dated within the given month, most recently created first
    pub fn list_transactions_for_month(&self, month: &MonthToken) -> Result<Vec<Transaction>> {
        self.list_transactions_in_range(&month.range()?)
    }

    /// List transactions with `range.start <= date <= range.end`
    pub fn list_transactions_in_range(&self, range: &MonthRange) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions WHERE date >= ? AND date <= ? {}",
            TRANSACTION_COLUMNS, TRANSACTION_ORDER
        ))?;

        let rows = stmt.query_map(
            params![range.start.to_string(), range.end.to_string()],
            Self::row_to_transaction,
        )?;
        let transactions = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(transactions)
    }

    /// Get a single transaction by ID
    pub fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        Self::get_transaction_with_conn(&conn, id)
    }

    fn get_transaction_with_conn(conn: &Connection, id: i64) -> Result<Option<Transaction>> {
        let tx = conn
            .query_row(
                &format!("SELECT {} FROM transactions WHERE id = ?", TRANSACTION_COLUMNS),
                params![id],
                Self::row_to_transaction,
            )
            .optional()?;
        Ok(tx)
    }

    /// Insert a transaction, assigning its ID and creation timestamp
    ///
    /// Content rules (description length, non-negative amount) are the
    /// caller's job; see [`NewTransaction::validate`].
    pub fn insert_transaction(&self, tx: &NewTransaction) -> Result<Transaction> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO transactions (date, category, description, amount) VALUES (?, ?, ?, ?)",
            params![
                tx.date.to_string(),
                tx.category.as_str(),
                tx.description,
                tx.amount,
            ],
        )?;
        let id = conn.last_insert_rowid();

        info!(id, category = %tx.category, date = %tx.date, "Transaction added");

        Self::get_transaction_with_conn(&conn, id)?
            .ok_or_else(|| Error::NotFound(format!("transaction {}", id)))
    }

    /// Delete a transaction by ID, returning the deleted ID
    pub fn delete_transaction(&self, id: i64) -> Result<i64> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM transactions WHERE id = ?", params![id])?;

        if deleted == 0 {
            warn!(id, "Delete requested for missing transaction");
            return Err(Error::NotFound(format!("transaction {}", id)));
        }

        info!(id, "Transaction deleted");
        Ok(id)
    }

    fn row_to_transaction(row: &Row) -> rusqlite::Result<Transaction> {
        let date_str: String = row.get(1)?;
        let category_str: String = row.get(2)?;
        let created_at_str: String = row.get(5)?;

        Ok(Transaction {
            id: row.get(0)?,
            date: parse_date(&date_str).map_err(|e| conversion_error(1, e))?,
            category: parse_category(&category_str).map_err(|e| conversion_error(2, e))?,
            description: row.get(3)?,
            amount: row.get(4)?,
            created_at: parse_datetime(&created_at_str).map_err(|e| conversion_error(5, e))?,
        })
    }
}

/// Surface a stored value that no longer parses as a row conversion failure
pub(super) fn conversion_error(column: usize, err: Error) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        rusqlite::types::Type::Text,
        Box::new(err),
    )
}
