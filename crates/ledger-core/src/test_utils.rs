//! Test utilities for Ledger
//!
//! `TestDb` gives each test its own unencrypted database file inside a
//! temporary directory. The directory (and the WAL sidecar files) are removed
//! when the `TestDb` is dropped.

use std::ops::Deref;

use chrono::NaiveDate;
use tempfile::TempDir;

use crate::db::Database;
use crate::error::Result;
use crate::models::{Category, NewBudget, NewTransaction, Transaction};

/// An ephemeral database scoped to the lifetime of this value
pub struct TestDb {
    db: Database,
    // Dropped after `db` (field order), removing the files on disk
    _dir: TempDir,
}

impl TestDb {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("ledger_test.db");
        let db = Database::new_unencrypted(&path.to_string_lossy())?;
        Ok(Self { db, _dir: dir })
    }

    /// A clone of the underlying handle (shares the same pool)
    pub fn database(&self) -> Database {
        self.db.clone()
    }

    /// Insert a transaction from plain values
    pub fn add_transaction(
        &self,
        date: &str,
        category: Category,
        description: &str,
        amount: f64,
    ) -> Result<Transaction> {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| crate::Error::Validation(e.to_string()))?;
        self.db.insert_transaction(&NewTransaction {
            date,
            category,
            description: description.to_string(),
            amount,
        })
    }

    /// Upsert a budget from plain values
    pub fn set_budget(
        &self,
        month: &str,
        category: Category,
        amount: f64,
    ) -> Result<crate::Budget> {
        let upsert = self.db.upsert_budget(&NewBudget {
            month: month.parse()?,
            category,
            amount,
        })?;
        Ok(upsert.into_budget())
    }
}

impl Deref for TestDb {
    type Target = Database;

    fn deref(&self) -> &Database {
        &self.db
    }
}
