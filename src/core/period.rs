//! Calendar month selection used to scope every ledger query.

use super::error::LedgerError;
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// A (month, year) pair. `month` is zero based (January is 0) because that is
/// how the backend keys its collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn new(month: u32, year: i32) -> Result<Self, LedgerError> {
        if month > 11 {
            return Err(LedgerError::InvalidPeriod(format!(
                "month {month} is outside 0-11"
            )));
        }
        if !(1..=9999).contains(&year) {
            return Err(LedgerError::InvalidPeriod(format!(
                "year {year} is outside 1-9999"
            )));
        }
        Ok(Self { year, month })
    }

    /// The period a calendar date falls in.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month0(),
        }
    }

    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// The period immediately before this one. January wraps to December of
    /// the previous year.
    pub fn previous(&self) -> Self {
        if self.month == 0 {
            Self {
                year: self.year - 1,
                month: 11,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Last calendar day of the month.
    pub fn end_date(&self) -> NaiveDate {
        let (year, month) = if self.month == 11 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 2)
        };
        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|first_of_next| first_of_next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn matches(&self, month: u32, year: i32) -> bool {
        self.month == month && self.year == year
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month + 1)
    }
}

impl FromStr for Period {
    type Err = LedgerError;

    /// Parses `YYYY-MM` with a calendar month (1-12).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::InvalidPeriod(format!("'{s}' is not in YYYY-MM form"));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Self::new(month - 1, year)
    }
}
