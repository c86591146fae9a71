//! Domain models for Ledger

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::month::MonthToken;

/// Minimum number of characters in a transaction description
pub const MIN_DESCRIPTION_LEN: usize = 2;

/// Spending category
///
/// The set is closed: anything outside it is rejected, never coerced into
/// `Other`. Declaration order is the display order used by every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Bills,
    Other,
}

impl Category {
    /// Every category, in display order
    pub const ALL: [Category; 5] = [
        Self::Food,
        Self::Transport,
        Self::Entertainment,
        Self::Bills,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Entertainment => "Entertainment",
            Self::Bills => "Bills",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Food" => Ok(Self::Food),
            "Transport" => Ok(Self::Transport),
            "Entertainment" => Ok(Self::Entertainment),
            "Bills" => Ok(Self::Bills),
            "Other" => Ok(Self::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub category: Category,
    pub description: String,
    /// Always non-negative
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

/// A transaction to be inserted (before DB insertion)
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub category: Category,
    pub description: String,
    pub amount: f64,
}

impl NewTransaction {
    /// Check the content rules: description length and non-negative amount
    pub fn validate(&self) -> Result<()> {
        if self.description.trim().chars().count() < MIN_DESCRIPTION_LEN {
            return Err(Error::Validation(format!(
                "Description must be at least {} characters",
                MIN_DESCRIPTION_LEN
            )));
        }
        validate_amount(self.amount)
    }
}

/// A monthly spending ceiling for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub month: MonthToken,
    pub category: Category,
    pub amount: f64,
    /// Set when the budget is first created, kept across amount updates
    pub created_at: DateTime<Utc>,
}

/// A budget to be inserted or upserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    pub month: MonthToken,
    pub category: Category,
    pub amount: f64,
}

impl NewBudget {
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount)
    }
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::Validation(
            "Amount must be a non-negative number".to_string(),
        ));
    }
    Ok(())
}

/// Raw transaction payload as submitted by a client
///
/// Every field is optional so that a missing field is reported as a
/// validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionInput {
    pub date: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: Option<f64>,
}

impl TransactionInput {
    /// Structural check: all fields present, category known, date parseable
    pub fn parse(self) -> Result<NewTransaction> {
        let (Some(date), Some(category), Some(description), Some(amount)) =
            (self.date, self.category, self.description, self.amount)
        else {
            return Err(Error::Validation("All fields are required".to_string()));
        };

        Ok(NewTransaction {
            date: parse_date(&date)?,
            category: parse_category(&category)?,
            description,
            amount,
        })
    }
}

/// Raw budget payload as submitted by a client
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetInput {
    pub month: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: Option<f64>,
}

impl BudgetInput {
    pub fn parse(self) -> Result<NewBudget> {
        let (Some(month), Some(category), Some(amount)) = (self.month, self.category, self.amount)
        else {
            return Err(Error::Validation("All fields are required".to_string()));
        };

        Ok(NewBudget {
            month: month.parse()?,
            category: parse_category(&category)?,
            amount,
        })
    }
}

pub fn parse_category(s: &str) -> Result<Category> {
    s.parse().map_err(Error::Validation)
}

/// Parse a transaction date: `YYYY-MM-DD`, or an RFC 3339 timestamp whose
/// calendar date (UTC) is used
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| Error::Validation(format!("Invalid date: {} (use YYYY-MM-DD)", s)))
}

/// Accept amounts as JSON numbers or numeric strings (HTML form values)
fn deserialize_amount<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Option::<Amount>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Amount::Number(n)) => Ok(Some(n)),
        Some(Amount::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Amount::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid amount: {}", s))),
    }
}
