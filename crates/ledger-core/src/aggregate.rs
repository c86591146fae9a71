//! Derived views over already-fetched transactions and budgets
//!
//! Everything here is pure and synchronous: callers fetch records from the
//! store (usually scoped to one month) and pass them in. The `categories`
//! slice (normally [`Category::ALL`]) picks which categories appear.
//! `budget_vs_actual` rows follow the slice order; the map-backed outputs
//! (`category_totals`, `pie_series`, `DailySpending::amounts`) follow
//! `Category`'s declaration order.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Budget, Category, Transaction};
use crate::month::MonthToken;

/// Number of transactions shown in the dashboard's "recent" list
pub const RECENT_TRANSACTIONS: usize = 5;

/// Budget and actual spend for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetComparison {
    pub category: Category,
    /// Zero when no budget is set
    pub budget: f64,
    pub actual: f64,
}

/// One pie chart slice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub name: Category,
    pub value: f64,
}

/// Spending on one calendar date, broken down by category
///
/// Serializes flat: `{"date": "2025-04-05", "Food": 40.0, "Transport": 0.0, ...}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySpending {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub amounts: BTreeMap<Category, f64>,
}

/// Sum of transaction amounts per category; categories without spending map to zero
pub fn category_totals(
    transactions: &[Transaction],
    categories: &[Category],
) -> BTreeMap<Category, f64> {
    let mut totals: BTreeMap<Category, f64> = categories.iter().map(|c| (*c, 0.0)).collect();

    for tx in transactions {
        if let Some(total) = totals.get_mut(&tx.category) {
            *total += tx.amount;
        }
    }

    totals
}

/// Budget vs. actual per category, in `categories` order
pub fn budget_vs_actual(
    transactions: &[Transaction],
    budgets: &[Budget],
    categories: &[Category],
) -> Vec<BudgetComparison> {
    let totals = category_totals(transactions, categories);

    categories
        .iter()
        .map(|category| BudgetComparison {
            category: *category,
            budget: budgets
                .iter()
                .find(|b| b.category == *category)
                .map(|b| b.amount)
                .unwrap_or(0.0),
            actual: totals.get(category).copied().unwrap_or(0.0),
        })
        .collect()
}

/// Over/under-budget messages for every row with a nonzero budget
///
/// A zero budget means "no budget set" and yields no message.
pub fn insights(rows: &[BudgetComparison]) -> Vec<String> {
    rows.iter()
        .filter(|row| row.budget != 0.0)
        .map(|row| {
            if row.actual > row.budget {
                format!(
                    "Over budget on {} by ${:.2}.",
                    row.category,
                    row.actual - row.budget
                )
            } else if row.actual < row.budget {
                format!(
                    "Under budget on {} by ${:.2}.",
                    row.category,
                    row.budget - row.actual
                )
            } else {
                format!("On budget for {}.", row.category)
            }
        })
        .collect()
}

/// Pie chart slices, omitting categories with exactly zero spend
pub fn pie_series(totals: &BTreeMap<Category, f64>) -> Vec<PieSlice> {
    totals
        .iter()
        .filter(|(_, value)| **value != 0.0)
        .map(|(category, value)| PieSlice {
            name: *category,
            value: *value,
        })
        .collect()
}

/// Per-date spending with every category present, in first-encountered date order
///
/// Not sorted by calendar date; callers that need calendar order sort the result.
pub fn daily_stacked_series(
    transactions: &[Transaction],
    categories: &[Category],
) -> Vec<DailySpending> {
    let mut series: Vec<DailySpending> = Vec::new();
    let mut index_by_date: BTreeMap<NaiveDate, usize> = BTreeMap::new();

    for tx in transactions {
        let idx = *index_by_date.entry(tx.date).or_insert_with(|| {
            series.push(DailySpending {
                date: tx.date,
                amounts: categories.iter().map(|c| (*c, 0.0)).collect(),
            });
            series.len() - 1
        });

        if let Some(amount) = series[idx].amounts.get_mut(&tx.category) {
            *amount += tx.amount;
        }
    }

    series
}

/// Sum of all transaction amounts
pub fn total_spent(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(|tx| tx.amount).sum()
}

/// The `limit` most recently created transactions
pub fn recent_transactions(transactions: &[Transaction], limit: usize) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    sorted.truncate(limit);
    sorted
}

/// Budget planner view for one month
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyBudgetReport {
    pub month: MonthToken,
    pub comparisons: Vec<BudgetComparison>,
    pub insights: Vec<String>,
    pub total_budget: f64,
    pub total_actual: f64,
}

impl MonthlyBudgetReport {
    /// Build from the month's transactions and budgets
    pub fn build(month: MonthToken, transactions: &[Transaction], budgets: &[Budget]) -> Self {
        let comparisons = budget_vs_actual(transactions, budgets, &Category::ALL);
        let insights = insights(&comparisons);
        let total_budget = comparisons.iter().map(|c| c.budget).sum();
        let total_actual = comparisons.iter().map(|c| c.actual).sum();

        Self {
            month,
            comparisons,
            insights,
            total_budget,
            total_actual,
        }
    }
}

/// Dashboard view: totals, pie chart and most recent transactions
#[derive(Debug, Clone, Serialize)]
pub struct SpendingSummary {
    pub total: f64,
    pub category_totals: BTreeMap<Category, f64>,
    pub pie: Vec<PieSlice>,
    pub recent: Vec<Transaction>,
}

impl SpendingSummary {
    pub fn build(transactions: &[Transaction], recent_limit: usize) -> Self {
        let category_totals = category_totals(transactions, &Category::ALL);
        let pie = pie_series(&category_totals);

        Self {
            total: total_spent(transactions),
            category_totals,
            pie,
            recent: recent_transactions(transactions, recent_limit),
        }
    }
}
