use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when parsing a financial year key.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FinancialYearError {
    /// The key does not match the `YYYY-YY` shape.
    #[error("malformed financial year key '{0}', expected YYYY-YY")]
    Malformed(String),

    /// The two-digit suffix is not the start year plus one.
    #[error("financial year key '{0}' suffix must be the start year plus one")]
    MismatchedSuffix(String),
}

/// An Australian financial year: 1 July to 30 June, keyed as `"YYYY-YY"`.
///
/// Ordering follows the start year, so `"2023-24" < "2024-25"`.
///
/// # Example
///
/// ```
/// use oztax_core::models::FinancialYear;
///
/// let fy: FinancialYear = "2024-25".parse().unwrap();
/// assert_eq!(fy.start_year(), 2024);
/// assert_eq!(fy.to_string(), "2024-25");
/// assert_eq!(fy.next().to_string(), "2025-26");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FinancialYear {
    start_year: i32,
}

impl FinancialYear {
    /// The financial year beginning 1 July of `start_year`.
    pub fn starting(start_year: i32) -> Self {
        Self { start_year }
    }

    /// The financial year containing `date`.
    ///
    /// Dates in July or later belong to the year starting that calendar year;
    /// dates before July belong to the year starting the previous calendar year.
    pub fn from_date(date: NaiveDate) -> Self {
        if date.month() >= 7 {
            Self::starting(date.year())
        } else {
            Self::starting(date.year() - 1)
        }
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    /// The following financial year.
    pub fn next(&self) -> Self {
        Self::starting(self.start_year + 1)
    }

    /// The preceding financial year.
    pub fn prev(&self) -> Self {
        Self::starting(self.start_year - 1)
    }

    /// Whole years between `self` and an earlier year. Negative when `earlier`
    /// is actually later.
    pub fn years_after(&self, earlier: &FinancialYear) -> i32 {
        self.start_year - earlier.start_year
    }
}

impl fmt::Display for FinancialYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{:02}",
            self.start_year,
            (self.start_year + 1).rem_euclid(100)
        )
    }
}

impl FromStr for FinancialYear {
    type Err = FinancialYearError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || FinancialYearError::Malformed(s.to_string());

        let (start, suffix) = s.split_once('-').ok_or_else(malformed)?;
        if start.len() != 4 || suffix.len() != 2 {
            return Err(malformed());
        }
        let start_year: i32 = start.parse().map_err(|_| malformed())?;
        let suffix: i32 = suffix.parse().map_err(|_| malformed())?;

        if (start_year + 1).rem_euclid(100) != suffix {
            return Err(FinancialYearError::MismatchedSuffix(s.to_string()));
        }

        Ok(Self::starting(start_year))
    }
}

impl TryFrom<String> for FinancialYear {
    type Error = FinancialYearError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FinancialYear> for String {
    fn from(fy: FinancialYear) -> Self {
        fy.to_string()
    }
}
