//! Calculation logic for the payroll engine.
//!
//! This module contains the calculation stages that turn attendance into
//! declared amounts: earnings formula compilation and evaluation,
//! effective-dated contribution rate lookup, contribution splitting,
//! progressive income tax and solidarity levy withholding, the
//! aggregation pipeline and its per-employee summary, period joining for
//! multi-run declarations, and the statutory entitlement helpers for
//! seasonal bonuses, leave allowance and severance.

mod aggregate;
mod contributions;
mod entitlements;
mod formula;
mod join;
mod rates;
mod tax;

pub use aggregate::{aggregate, summarize};
pub use contributions::split_contribution;
pub use entitlements::{
    christmas_bonus, easter_bonus, leave_allowance, severance_days, severance_months,
    severance_pay,
};
pub use formula::{Binding, Formula};
pub use join::join;
pub use rates::RateTable;
pub use tax::{
    MIN_TAX_YEAR, TaxAssessment, TaxBracket, annual_tax, brackets_for_year, child_deduction,
    period_tax, solidarity_levy,
};
