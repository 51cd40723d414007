//! Employee model and family-status history.
//!
//! This module defines the [`Employee`] struct carrying the statutory
//! identifiers the declarations need, plus the time-sliced record of how
//! many children the employee has (which drives the tax deduction).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::effective::latest_at_or_before;
use crate::models::Period;

/// A change in an employee's family status, effective from a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyStatusChange {
    /// The first period the new status applies to.
    pub effective: Period,
    /// Number of dependent children from that period on.
    pub children: u32,
}

/// Represents an employee as the statutory declarations see one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Social-security registration number (ΑΜΑ), zero-padded to 9 digits
    /// in the declaration file.
    pub registration_number: u32,
    /// Social-insurance number (ΑΜΚΑ), 11 digits.
    pub insurance_number: String,
    /// Tax ID (ΑΦΜ), 9 digits.
    pub tax_id: String,
    /// Surname.
    pub surname: String,
    /// First name.
    pub first_name: String,
    /// Father's name.
    pub father_name: String,
    /// Mother's name.
    pub mother_name: String,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Family-status history, any order.
    #[serde(default)]
    pub family_changes: Vec<FamilyStatusChange>,
}

impl Employee {
    /// The name the reports sort and display by.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.surname, self.first_name)
    }

    /// The ordering key for report lines: surname, first name, father's
    /// name.
    pub fn sort_key(&self) -> (&str, &str, &str) {
        (&self.surname, &self.first_name, &self.father_name)
    }

    /// Number of dependent children effective in a period.
    ///
    /// Resolved as the latest family-status change at or before the
    /// period; an employee with no recorded change has no children.
    pub fn children_at(&self, period: Period) -> u32 {
        latest_at_or_before(&self.family_changes, period, |c| c.effective)
            .map(|c| c.children)
            .unwrap_or(0)
    }
}
