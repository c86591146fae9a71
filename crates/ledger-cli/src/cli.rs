//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Ledger - Track expenses against monthly budgets
#[derive(Parser)]
#[command(name = "ledger")]
#[command(about = "Self-hosted personal expense ledger", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "ledger.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set LEDGER_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory with the built web UI to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// List, add or delete transactions
    Transactions {
        #[command(subcommand)]
        action: Option<TransactionsAction>,
    },

    /// List, set or delete monthly budgets
    Budgets {
        #[command(subcommand)]
        action: Option<BudgetsAction>,
    },

    /// Generate spending reports
    Report {
        #[command(subcommand)]
        report_type: ReportType,
    },
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// List transactions, newest first
    List {
        /// Only show transactions in this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,

        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Record a transaction
    Add {
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Category: Food, Transport, Entertainment, Bills, Other
        #[arg(long)]
        category: String,

        /// What the money was spent on
        #[arg(long)]
        description: String,

        /// Amount spent (non-negative)
        #[arg(long)]
        amount: f64,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum BudgetsAction {
    /// List budgets
    List {
        /// Only show budgets for this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Create or update the budget for a month and category
    Set {
        /// Month (YYYY-MM)
        month: String,

        /// Category: Food, Transport, Entertainment, Bills, Other
        category: String,

        /// Budget amount (non-negative)
        amount: f64,
    },

    /// Delete a budget
    Delete {
        /// Budget ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Budget vs. actual spending with insights for one month
    Budget {
        /// Month (YYYY-MM)
        month: String,
    },

    /// Totals per category and the most recent transactions
    Summary {
        /// Limit to one month (YYYY-MM); all time if omitted
        #[arg(short, long)]
        month: Option<String>,
    },
}
