//! Calendar month a usage sample or evaluation belongs to.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;
use utoipa::ToSchema;

/// Years the dashboard accepts
pub const DASHBOARD_MIN_YEAR: i32 = 2000;
pub const DASHBOARD_MAX_YEAR: i32 = 2100;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Month must be between 1 and 12, got {0}")]
    InvalidMonth(i32),
    #[error("Year {0} is outside the supported calendar")]
    InvalidYear(i32),
    #[error("Dashboard year must be between 2000 and 2100, got {0}")]
    OutsideDashboardRange(i32),
    #[error("Expected a period formatted as YYYY-MM, got '{0}'")]
    Malformed(String),
}

/// A (year, month) pair, validated on construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub struct UsagePeriod {
    year: i32,
    month: u32,
}

impl UsagePeriod {
    pub fn new(year: i32, month: i32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        // Both ends of the month must be representable for days_in_month
        let month = month as u32;
        let (next_year, next_month) = if month == 12 {
            (year.checked_add(1), 1)
        } else {
            (Some(year), month + 1)
        };
        let representable = NaiveDate::from_ymd_opt(year, month, 1).is_some()
            && next_year
                .and_then(|next_year| NaiveDate::from_ymd_opt(next_year, next_month, 1))
                .is_some();
        if !representable {
            return Err(PeriodError::InvalidYear(year));
        }
        Ok(Self { year, month })
    }

    /// Like [`UsagePeriod::new`], additionally restricted to the years the dashboard serves
    pub fn for_dashboard(year: i32, month: i32) -> Result<Self, PeriodError> {
        let period = Self::new(year, month)?;
        if !(DASHBOARD_MIN_YEAR..=DASHBOARD_MAX_YEAR).contains(&year) {
            return Err(PeriodError::OutsideDashboardRange(year));
        }
        Ok(period)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Month number in the form stored in the database
    pub fn month_i32(&self) -> i32 {
        self.month as i32
    }

    /// Number of calendar days in the month (28, 29, 30 or 31)
    pub fn days_in_month(&self) -> u32 {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };

        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|next| next.pred_opt())
            .map(|last| last.day())
            .unwrap_or(30)
    }
}

impl fmt::Display for UsagePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for UsagePeriod {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| PeriodError::Malformed(s.to_string()))?;
        let year = year
            .parse::<i32>()
            .map_err(|_| PeriodError::Malformed(s.to_string()))?;
        let month = month
            .parse::<i32>()
            .map_err(|_| PeriodError::Malformed(s.to_string()))?;
        Self::new(year, month)
    }
}
