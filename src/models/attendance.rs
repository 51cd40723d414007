//! Attendance entries: the raw input of a payroll run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Period;

/// One attendance record: a quantity of a presence type booked against an
/// employment in a month.
///
/// The quantity counts days or hours depending on which earnings formula
/// the presence type resolves to; the engine does not interpret it beyond
/// summing. The optional date range narrows the days actually worked
/// inside the month and flows into the social-security declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    /// The employment the entry belongs to.
    pub employment_id: String,
    /// The month the entry was booked in.
    pub period: Period,
    /// Presence-type code (e.g. `worked_days`, `night_hours`).
    pub presence_type: String,
    /// Booked quantity, days or hours.
    pub quantity: u32,
    /// First day covered, when narrower than the month.
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    /// Last day covered, when narrower than the month.
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
}
