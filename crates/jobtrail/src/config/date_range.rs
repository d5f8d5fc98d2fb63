//! Date-range tag attached to a run.
//!
//! The range itself is applied by the fetch layer (it only selects which
//! messages are supplied); here it names artifacts and tags failures so
//! repeated runs over different windows stay traceable.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DateRange {
    #[default]
    All,
    Last24Hours,
    LastWeek,
    LastMonth,
    Last3Months,
    LastYear,
    Custom { start: NaiveDate, end: NaiveDate },
}

impl DateRange {
    /// Human-readable description, used in failure records.
    pub fn description(&self) -> String {
        match self {
            DateRange::All => "All time".to_string(),
            DateRange::Last24Hours => "Last 24 hours".to_string(),
            DateRange::LastWeek => "Last 7 days".to_string(),
            DateRange::LastMonth => "Last 30 days".to_string(),
            DateRange::Last3Months => "Last 90 days".to_string(),
            DateRange::LastYear => "Last year".to_string(),
            DateRange::Custom { start, end } => format!("From {} to {}", start, end),
        }
    }

    /// Filename-safe suffix, used in artifact names and batch ids.
    pub fn file_suffix(&self) -> String {
        match self {
            DateRange::All => "all_time".to_string(),
            DateRange::Last24Hours => "last_24h".to_string(),
            DateRange::LastWeek => "last_week".to_string(),
            DateRange::LastMonth => "last_month".to_string(),
            DateRange::Last3Months => "last_3months".to_string(),
            DateRange::LastYear => "last_year".to_string(),
            DateRange::Custom { start, end } => format!("custom_{}_to_{}", start, end),
        }
    }

    /// Search filter for the mail provider, relative to `today`.
    /// Empty for [`DateRange::All`].
    pub fn search_query(&self, today: NaiveDate) -> String {
        let after = |days: i64| format!("after:{}", (today - Duration::days(days)).format("%Y/%m/%d"));
        match self {
            DateRange::All => String::new(),
            DateRange::Last24Hours => after(1),
            DateRange::LastWeek => after(7),
            DateRange::LastMonth => after(30),
            DateRange::Last3Months => after(90),
            DateRange::LastYear => after(365),
            DateRange::Custom { start, end } => format!(
                "after:{} before:{}",
                start.format("%Y/%m/%d"),
                end.format("%Y/%m/%d")
            ),
        }
    }
}

impl FromStr for DateRange {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ConfigError::InvalidDateRange {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        if let Some((start, end)) = value.split_once(':') {
            let parse = |s: &str| {
                NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                    .map_err(|_| invalid("Invalid date format. Use YYYY-MM-DD:YYYY-MM-DD"))
            };
            let start = parse(start)?;
            let end = parse(end)?;
            if start > end {
                return Err(invalid("Start date must be before end date"));
            }
            return Ok(DateRange::Custom { start, end });
        }

        match value.trim().to_lowercase().as_str() {
            "" | "all" => Ok(DateRange::All),
            "24h" | "1d" => Ok(DateRange::Last24Hours),
            "7d" | "1w" => Ok(DateRange::LastWeek),
            "30d" | "1m" => Ok(DateRange::LastMonth),
            "90d" | "3m" => Ok(DateRange::Last3Months),
            "1y" => Ok(DateRange::LastYear),
            _ => Err(invalid("Unknown date range")),
        }
    }
}

impl TryFrom<String> for DateRange {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateRange> for String {
    fn from(range: DateRange) -> Self {
        range.to_string()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateRange::All => f.write_str("all"),
            DateRange::Last24Hours => f.write_str("24h"),
            DateRange::LastWeek => f.write_str("7d"),
            DateRange::LastMonth => f.write_str("30d"),
            DateRange::Last3Months => f.write_str("90d"),
            DateRange::LastYear => f.write_str("1y"),
            DateRange::Custom { start, end } => write!(f, "{}:{}", start, end),
        }
    }
}
