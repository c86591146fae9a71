//! Transaction command implementations

use anyhow::{Context, Result};
use ledger_core::models::{parse_category, parse_date};
use ledger_core::{Database, MonthToken, NewTransaction};

use super::truncate;

pub fn cmd_transactions_list(db: &Database, month: Option<&str>, limit: usize) -> Result<()> {
    let transactions = match month {
        Some(m) => {
            let month: MonthToken = m.parse()?;
            db.list_transactions_for_month(&month)?
        }
        None => db.list_transactions()?,
    };

    if transactions.is_empty() {
        println!("No transactions found. Record one with:");
        println!("  ledger transactions add --date 2025-04-05 --category Food --description Lunch --amount 12.50");
        return Ok(());
    }

    println!();
    match month {
        Some(m) => println!("📝 Transactions for {}", m),
        None => println!("📝 Recent Transactions"),
    }
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions.iter().take(limit) {
        println!(
            "   [{}] {} │ {:<13} │ {:>10} │ {}",
            tx.id,
            tx.date,
            tx.category,
            format!("${:.2}", tx.amount),
            truncate(&tx.description, 35)
        );
    }

    if transactions.len() > limit {
        println!();
        println!(
            "   Showing {} of {} (use --limit to see more)",
            limit,
            transactions.len()
        );
    }

    Ok(())
}

pub fn cmd_transactions_add(
    db: &Database,
    date: &str,
    category: &str,
    description: &str,
    amount: f64,
) -> Result<()> {
    let new_tx = NewTransaction {
        date: parse_date(date)?,
        category: parse_category(category)?,
        description: description.to_string(),
        amount,
    };
    new_tx.validate()?;

    let tx = db
        .insert_transaction(&new_tx)
        .context("Failed to record transaction")?;

    println!("✅ Recorded transaction {}:", tx.id);
    println!(
        "   {} │ {} │ ${:.2} │ {}",
        tx.date,
        tx.category,
        tx.amount,
        truncate(&tx.description, 40)
    );

    Ok(())
}

pub fn cmd_transactions_delete(db: &Database, id: i64) -> Result<()> {
    db.delete_transaction(id)?;
    println!("🗑️  Deleted transaction {}", id);
    Ok(())
}
