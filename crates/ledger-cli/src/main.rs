//! Ledger CLI - Personal expense ledger
//!
//! Usage:
//!   ledger init                               Initialize database
//!   ledger transactions add --date ... --amount 12.50
//!   ledger budgets set 2025-04 Food 300       Set a monthly budget
//!   ledger report budget 2025-04              Budget vs. actual
//!   ledger serve --port 3000                  Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            static_dir,
        } => {
            commands::cmd_serve(&cli.db, &host, port, cli.no_encrypt, static_dir.as_deref())
                .await
        }
        Commands::Transactions { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None => commands::cmd_transactions_list(&db, None, 20),
                Some(TransactionsAction::List { month, limit }) => {
                    commands::cmd_transactions_list(&db, month.as_deref(), limit)
                }
                Some(TransactionsAction::Add {
                    date,
                    category,
                    description,
                    amount,
                }) => commands::cmd_transactions_add(&db, &date, &category, &description, amount),
                Some(TransactionsAction::Delete { id }) => {
                    commands::cmd_transactions_delete(&db, id)
                }
            }
        }
        Commands::Budgets { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None => commands::cmd_budgets_list(&db, None),
                Some(BudgetsAction::List { month }) => {
                    commands::cmd_budgets_list(&db, month.as_deref())
                }
                Some(BudgetsAction::Set {
                    month,
                    category,
                    amount,
                }) => commands::cmd_budgets_set(&db, &month, &category, amount),
                Some(BudgetsAction::Delete { id }) => commands::cmd_budgets_delete(&db, id),
            }
        }
        Commands::Report { report_type } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match report_type {
                ReportType::Budget { month } => commands::cmd_report_budget(&db, &month),
                ReportType::Summary { month } => {
                    commands::cmd_report_summary(&db, month.as_deref())
                }
            }
        }
    }
}
