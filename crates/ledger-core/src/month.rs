//! Month token parsing and month range resolution
//!
//! A month token is a `YYYY-MM` string chosen by the user (e.g. from a month
//! picker). Budgets are keyed by it, and transaction queries are scoped to the
//! inclusive date range it covers.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}$").expect("valid regex"))
}

/// A validated `YYYY-MM` month token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthToken {
    year: i32,
    month: u32,
}

impl MonthToken {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(0..=9999).contains(&year) || !(1..=12).contains(&month) {
            return Err(Error::InvalidMonthToken(format!("{:04}-{:02}", year, month)));
        }
        Ok(Self { year, month })
    }

    /// The month containing `date`
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Inclusive date range covered by this month
    pub fn range(&self) -> Result<MonthRange> {
        let invalid = || Error::InvalidMonthToken(self.to_string());

        let start = NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or_else(invalid)?;
        let next_month = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        };
        let end = next_month
            .and_then(|d| d.pred_opt())
            .ok_or_else(invalid)?;

        Ok(MonthRange { start, end })
    }
}

impl FromStr for MonthToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if !token_pattern().is_match(s) {
            return Err(Error::InvalidMonthToken(s.to_string()));
        }

        // Pattern guarantees both halves are ASCII digits
        let year: i32 = s[..4]
            .parse()
            .map_err(|_| Error::InvalidMonthToken(s.to_string()))?;
        let month: u32 = s[5..]
            .parse()
            .map_err(|_| Error::InvalidMonthToken(s.to_string()))?;

        Self::new(year, month).map_err(|_| Error::InvalidMonthToken(s.to_string()))
    }
}

impl TryFrom<String> for MonthToken {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<MonthToken> for String {
    fn from(token: MonthToken) -> Self {
        token.to_string()
    }
}

impl fmt::Display for MonthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Inclusive calendar-day bounds of one month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthRange {
    /// First day of the month
    pub start: NaiveDate,
    /// Last day of the month (28-31 depending on month and leap year)
    pub end: NaiveDate,
}

impl MonthRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Midnight at the beginning of the first day
    pub fn start_of_day(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// Last representable instant of the last day
    pub fn end_of_day(&self) -> NaiveDateTime {
        let last = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN);
        self.end.and_time(last)
    }

    /// Number of days in the month
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Resolve a `YYYY-MM` token into its inclusive date range
pub fn resolve_month(token: &str) -> Result<MonthRange> {
    token.parse::<MonthToken>()?.range()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_resolve_leap_february() {
        let range = resolve_month("2024-02").unwrap();
        assert_eq!(range.start, date(2024, 2, 1));
        assert_eq!(range.end, date(2024, 2, 29));
        assert_eq!(range.days(), 29);
    }

    #[test]
    fn test_resolve_common_february() {
        let range = resolve_month("2025-02").unwrap();
        assert_eq!(range.start, date(2025, 2, 1));
        assert_eq!(range.end, date(2025, 2, 28));
        assert!(!range.contains(date(2025, 3, 1)));
        assert!(range.contains(date(2025, 2, 28)));
    }

    #[test]
    fn test_century_leap_rule() {
        assert_eq!(resolve_month("1900-02").unwrap().end, date(1900, 2, 28));
        assert_eq!(resolve_month("2000-02").unwrap().end, date(2000, 2, 29));
    }

    #[test]
    fn test_december_rolls_over_year() {
        let range = resolve_month("2024-12").unwrap();
        assert_eq!(range.start, date(2024, 12, 1));
        assert_eq!(range.end, date(2024, 12, 31));
    }

    #[test]
    fn test_every_month_starts_on_day_one_and_ends_after_start() {
        let expected_last_days = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        for (i, last) in expected_last_days.iter().enumerate() {
            let token = format!("2023-{:02}", i + 1);
            let range = resolve_month(&token).unwrap();
            assert_eq!(range.start.day(), 1, "{}", token);
            assert_eq!(range.end.day(), *last, "{}", token);
            assert!(range.start <= range.end);
        }
    }

    #[test]
    fn test_day_bounds_are_inclusive() {
        let range = resolve_month("2025-04").unwrap();
        assert_eq!(range.start_of_day().to_string(), "2025-04-01 00:00:00");
        assert_eq!(
            range.end_of_day().to_string(),
            "2025-04-30 23:59:59.999999999"
        );
    }

    #[test]
    fn test_rejects_malformed_tokens() {
        for bad in [
            "2025-4",
            "25-04",
            "2025/04",
            "2025-04-01",
            "",
            "abcd-ef",
            "2025-13",
            "2025-00",
        ] {
            let err = resolve_month(bad).unwrap_err();
            assert!(
                matches!(err, Error::InvalidMonthToken(_)),
                "expected InvalidMonthToken for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_token_display_and_serde() {
        let token: MonthToken = "2025-04".parse().unwrap();
        assert_eq!(token.to_string(), "2025-04");
        assert_eq!(token.year(), 2025);
        assert_eq!(token.month(), 4);

        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, "\"2025-04\"");
        let back: MonthToken = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);

        assert!(serde_json::from_str::<MonthToken>("\"2025-4\"").is_err());
    }

    #[test]
    fn test_month_of_date() {
        assert_eq!(MonthToken::of(date(2025, 3, 1)).to_string(), "2025-03");
    }
}
