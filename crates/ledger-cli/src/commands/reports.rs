//! Report command implementations

use anyhow::Result;
use ledger_core::aggregate::RECENT_TRANSACTIONS;
use ledger_core::{Database, MonthToken, MonthlyBudgetReport, SpendingSummary};

use super::truncate;

pub fn cmd_report_budget(db: &Database, month: &str) -> Result<()> {
    let month: MonthToken = month.parse()?;
    let range = month.range()?;

    let transactions = db.list_transactions_for_month(&month)?;
    let budgets = db.list_budgets(Some(&month))?;
    let report = MonthlyBudgetReport::build(month, &transactions, &budgets);

    println!();
    println!("📊 Budget vs. Actual");
    println!("   Period: {} to {}", range.start, range.end);
    println!("   ─────────────────────────────────────────────");
    println!("   {:<13}   {:>10}   {:>10}", "Category", "Budget", "Actual");

    for row in &report.comparisons {
        let budget = if row.budget == 0.0 {
            "-".to_string()
        } else {
            format!("${:.2}", row.budget)
        };
        let actual = format!("${:.2}", row.actual);
        // Red when over a set budget
        let actual = if row.budget != 0.0 && row.actual > row.budget {
            format!("\x1b[31m{:>10}\x1b[0m", actual)
        } else {
            format!("{:>10}", actual)
        };

        println!("   {:<13} │ {:>10} │ {}", row.category, budget, actual);
    }

    println!("   ─────────────────────────────────────────────");
    println!(
        "   {:<13} │ {:>10} │ {:>10}",
        "Total",
        format!("${:.2}", report.total_budget),
        format!("${:.2}", report.total_actual)
    );

    if !report.insights.is_empty() {
        println!();
        println!("💡 Insights");
        for insight in &report.insights {
            println!("   {}", insight);
        }
    }

    Ok(())
}

pub fn cmd_report_summary(db: &Database, month: Option<&str>) -> Result<()> {
    let month: Option<MonthToken> = month.map(str::parse).transpose()?;
    let transactions = match &month {
        Some(m) => db.list_transactions_for_month(m)?,
        None => db.list_transactions()?,
    };
    let summary = SpendingSummary::build(&transactions, RECENT_TRANSACTIONS);

    println!();
    match &month {
        Some(m) => println!("📊 Spending Summary for {}", m),
        None => println!("📊 Spending Summary (all time)"),
    }
    println!("   ─────────────────────────────────────────────");

    if transactions.is_empty() {
        println!("   No spending recorded.");
        return Ok(());
    }

    for (category, total) in &summary.category_totals {
        let share = if summary.total > 0.0 {
            total / summary.total * 100.0
        } else {
            0.0
        };
        println!(
            "   {:<13} │ {:>10} │ {:>5.1}%",
            category,
            format!("${:.2}", total),
            share
        );
    }
    println!("   ─────────────────────────────────────────────");
    println!("   {:<13} │ {:>10}", "Total", format!("${:.2}", summary.total));

    println!();
    println!("📝 Recent");
    for tx in &summary.recent {
        println!(
            "   {} │ {:<13} │ {:>10} │ {}",
            tx.date,
            tx.category,
            format!("${:.2}", tx.amount),
            truncate(&tx.description, 30)
        );
    }

    Ok(())
}
