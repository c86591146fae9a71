//! Budget command implementations

use anyhow::{Context, Result};
use ledger_core::models::parse_category;
use ledger_core::{BudgetUpsert, Database, MonthToken, NewBudget};

pub fn cmd_budgets_list(db: &Database, month: Option<&str>) -> Result<()> {
    let month: Option<MonthToken> = month.map(str::parse).transpose()?;
    let budgets = db.list_budgets(month.as_ref())?;

    if budgets.is_empty() {
        println!("No budgets set. Add one with:");
        println!("  ledger budgets set 2025-04 Food 300");
        return Ok(());
    }

    println!();
    println!("💰 Budgets");
    println!("   ─────────────────────────────────────────────");

    for budget in budgets {
        println!(
            "   [{}] {} │ {:<13} │ {:>10}",
            budget.id,
            budget.month,
            budget.category,
            format!("${:.2}", budget.amount)
        );
    }

    Ok(())
}

pub fn cmd_budgets_set(db: &Database, month: &str, category: &str, amount: f64) -> Result<()> {
    let new_budget = NewBudget {
        month: month.parse()?,
        category: parse_category(category)?,
        amount,
    };
    new_budget.validate()?;

    let result = db
        .upsert_budget(&new_budget)
        .context("Failed to save budget")?;

    let verb = match result {
        BudgetUpsert::Created(_) => "Added",
        BudgetUpsert::Updated(_) => "Updated",
    };
    let budget = result.into_budget();

    println!(
        "✅ {} budget {}: {} {} = ${:.2}",
        verb, budget.id, budget.month, budget.category, budget.amount
    );

    Ok(())
}

pub fn cmd_budgets_delete(db: &Database, id: i64) -> Result<()> {
    db.delete_budget(id)?;
    println!("🗑️  Deleted budget {}", id);
    Ok(())
}
