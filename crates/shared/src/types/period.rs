//! Accounting period (year + month).
//!
//! Payroll books, liquidations, and journal entries are all scoped by a
//! monthly period, written `YYYY-MM`.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors produced while parsing or building a period.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    /// Not in `YYYY-MM` (or `YYYYMM`) form.
    #[error("Invalid period format: {0} (expected YYYY-MM)")]
    InvalidFormat(String),

    /// Month outside 1..=12.
    #[error("Invalid month: {0}")]
    InvalidMonth(u32),

    /// Year outside the supported range.
    #[error("Invalid year: {0}")]
    InvalidYear(i32),
}

/// A monthly accounting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Creates a period.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError` when the month is not 1..=12 or the year is
    /// outside 1900..=9999.
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1900..=9999).contains(&year) {
            return Err(PeriodError::InvalidYear(year));
        }
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    /// Parses `YYYY-MM` or `YYYYMM`.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError` for malformed input or out-of-range values.
    pub fn parse(input: &str) -> Result<Self, PeriodError> {
        let trimmed = input.trim();
        let (year_str, month_str) = match trimmed.split_once('-') {
            Some(parts) => parts,
            None if trimmed.len() == 6 && trimmed.is_ascii() => trimmed.split_at(4),
            None => return Err(PeriodError::InvalidFormat(input.to_string())),
        };

        if year_str.len() != 4 || month_str.is_empty() || month_str.len() > 2 {
            return Err(PeriodError::InvalidFormat(input.to_string()));
        }

        let year: i32 = year_str
            .parse()
            .map_err(|_| PeriodError::InvalidFormat(input.to_string()))?;
        let month: u32 = month_str
            .parse()
            .map_err(|_| PeriodError::InvalidFormat(input.to_string()))?;

        Self::new(year, month)
    }

    /// The period containing `date`.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The period containing `instant` as seen in `timezone`.
    #[must_use]
    pub fn containing<Z: TimeZone>(instant: &DateTime<Z>, timezone: Tz) -> Self {
        Self::from_date(instant.with_timezone(&timezone).date_naive())
    }

    /// The current period in `timezone`.
    #[must_use]
    pub fn current(timezone: Tz) -> Self {
        Self::containing(&chrono::Utc::now(), timezone)
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month (1..=12).
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// First day of the period.
    #[must_use]
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the period.
    #[must_use]
    pub fn last_day(&self) -> NaiveDate {
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or_else(|| self.first_day())
    }

    /// The following period.
    #[must_use]
    pub const fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The preceding period.
    #[must_use]
    pub const fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for Period {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
