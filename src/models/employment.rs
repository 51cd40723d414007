//! Employment model: a worker's contract at a branch.
//!
//! An employment carries the specialty (which fixes the coverage packages
//! contributions are computed for), the schedule flags the declaration
//! reports, and the wage with its change history.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::effective::latest_at_or_before;
use crate::models::{Employee, Period, WageBasis, WageSnapshot};

/// One coverage assignment of a specialty: the insured activity plus the
/// coverage package contributions are computed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialtyCoverage {
    /// Insured activity code (ΚΑΔ), 4 characters.
    pub activity_code: String,
    /// Specialty code within the activity, 6 characters.
    pub specialty_code: String,
    /// Coverage package code (ΚΠΚ), 4 digits.
    pub package: String,
}

/// A job specialty with its coverage assignments.
///
/// Every assignment produces one contribution line per pay-type bucket, so
/// a specialty insured under a main and a supplementary fund lists two
/// assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialty {
    /// Human-readable name.
    pub name: String,
    /// Coverage assignments, in declaration order.
    pub coverages: Vec<SpecialtyCoverage>,
}

/// A compensation change, effective from a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensationChange {
    /// The first period the new wage applies to.
    pub effective: Period,
    /// The wage basis from that period on.
    pub wage_basis: WageBasis,
    /// The base amount on that basis.
    pub base_compensation: Decimal,
}

/// Represents an employment: one worker's contract at one branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employment {
    /// Unique identifier for the employment.
    pub id: String,
    /// The employed person.
    pub employee: Employee,
    /// Branch sequence number the employment belongs to.
    pub branch_number: u32,
    /// The job specialty with its coverage packages.
    pub specialty: Specialty,
    /// Full-time flag, reported on the social-security declaration.
    pub full_time: bool,
    /// Works-all-business-days flag, reported likewise.
    pub all_working_days: bool,
    /// The wage basis at hire.
    pub wage_basis: WageBasis,
    /// The base compensation at hire.
    pub base_compensation: Decimal,
    /// Hire date.
    pub start_date: NaiveDate,
    /// Termination date, if the employment has ended.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Compensation history, any order.
    #[serde(default)]
    pub compensation_changes: Vec<CompensationChange>,
}

impl Employment {
    /// The wage snapshot effective in a period: the latest compensation
    /// change at or before it, or the hire-time wage when none applies.
    pub fn wage_at(&self, period: Period) -> WageSnapshot {
        match latest_at_or_before(&self.compensation_changes, period, |c| c.effective) {
            Some(change) => WageSnapshot::derive(change.wage_basis, change.base_compensation),
            None => WageSnapshot::derive(self.wage_basis, self.base_compensation),
        }
    }

    /// The wage basis effective in a period.
    pub fn wage_basis_at(&self, period: Period) -> WageBasis {
        latest_at_or_before(&self.compensation_changes, period, |c| c.effective)
            .map(|c| c.wage_basis)
            .unwrap_or(self.wage_basis)
    }

    /// Whether the employment is active at any point of the given period.
    pub fn is_active_during(&self, period: Period) -> bool {
        let started = match Period::from_date(self.start_date) {
            Ok(start) => start <= period,
            Err(_) => false,
        };
        let not_ended = match self.end_date {
            Some(end) => Period::from_date(end).map(|e| e >= period).unwrap_or(false),
            None => true,
        };
        started && not_ended
    }
}
