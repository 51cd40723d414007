//! Pay period and reporting period models.
//!
//! This module defines the [`Period`] value type (a year-month key used for
//! every time-sliced lookup in the engine) and the [`PayPeriod`] describing
//! one payroll run.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The earliest period the engine accepts, matching the earliest data the
/// statutory tables can describe.
const MIN_PERIOD: u32 = 190001;

/// A reporting period expressed as a `YYYYMM` integer.
///
/// Periods order chronologically under plain integer comparison, which is
/// what every effective-dated lookup in the engine relies on.
///
/// # Example
///
/// ```
/// use misthos_engine::models::Period;
///
/// let jan = Period::from_parts(2024, 1).unwrap();
/// let jun = Period::from_parts(2024, 6).unwrap();
/// assert!(jan < jun);
/// assert_eq!(jan.to_string(), "202401");
/// assert_eq!(jan.month_code(), "01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Period(u32);

impl Period {
    /// Builds a period from a year and a 1-based month.
    pub fn from_parts(year: i32, month: u32) -> EngineResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidPeriod {
                message: format!("month {month} is out of range 1-12"),
            });
        }
        let raw = year as u32 * 100 + month;
        if year < 0 || raw < MIN_PERIOD {
            return Err(EngineError::InvalidPeriod {
                message: format!("period {year}-{month:02} predates {MIN_PERIOD}"),
            });
        }
        Ok(Period(raw))
    }

    /// Builds the period a calendar date falls in.
    pub fn from_date(date: NaiveDate) -> EngineResult<Self> {
        Self::from_parts(date.year(), date.month())
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        (self.0 / 100) as i32
    }

    /// The 1-based month.
    pub fn month(&self) -> u32 {
        self.0 % 100
    }

    /// The two-digit month code used by the report formats.
    pub fn month_code(&self) -> String {
        format!("{:02}", self.month())
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Period {
    type Error = EngineError;

    fn try_from(raw: u32) -> EngineResult<Self> {
        Period::from_parts((raw / 100) as i32, raw % 100)
    }
}

impl From<Period> for u32 {
    fn from(period: Period) -> u32 {
        period.0
    }
}

/// Describes one payroll run: the months it covers, the run type that
/// selects earnings formulas and the annualization factor, and the date the
/// run was issued.
///
/// The month range is validated at construction. The additional rule that a
/// regular-earnings run spans exactly one month is enforced when the run
/// type is resolved against configuration, before any aggregation happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The calendar year of the run.
    pub year: i32,
    /// First month covered (1-based, inclusive).
    pub from_month: u32,
    /// Last month covered (1-based, inclusive).
    pub to_month: u32,
    /// Code of the run type (e.g. `regular`, `christmas_bonus`).
    pub run_type: String,
    /// The date the run was issued.
    pub issue_date: NaiveDate,
}

impl PayPeriod {
    /// Creates a validated pay period.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPeriod`] when a month is out of range
    /// or the range is reversed.
    pub fn new(
        year: i32,
        from_month: u32,
        to_month: u32,
        run_type: impl Into<String>,
        issue_date: NaiveDate,
    ) -> EngineResult<Self> {
        if !(1..=12).contains(&from_month) || !(1..=12).contains(&to_month) {
            return Err(EngineError::InvalidPeriod {
                message: format!("months {from_month}-{to_month} are out of range 1-12"),
            });
        }
        if from_month > to_month {
            return Err(EngineError::InvalidPeriod {
                message: format!("month range {from_month}-{to_month} is reversed"),
            });
        }
        // Validates the year bound as a side effect.
        Period::from_parts(year, to_month)?;
        Ok(PayPeriod {
            year,
            from_month,
            to_month,
            run_type: run_type.into(),
            issue_date,
        })
    }

    /// The reporting period of the run: its year and *last* covered month.
    pub fn period(&self) -> Period {
        // Bounds were checked in `new`.
        Period(self.year as u32 * 100 + self.to_month)
    }

    /// Whether a monthly period falls inside the run's covered range.
    pub fn covers(&self, period: Period) -> bool {
        period.year() == self.year
            && period.month() >= self.from_month
            && period.month() <= self.to_month
    }

    /// True when the run covers a single month.
    pub fn is_single_month(&self) -> bool {
        self.from_month == self.to_month
    }
}
