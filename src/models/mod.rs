//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod aggregation;
mod attendance;
mod company;
mod effective;
mod employee;
mod employment;
mod identity;
mod pay_period;
mod wage;

pub use aggregation::{
    AggregationResult, ContributionLine, ContributionTotals, DeclarationTotals,
    EmploymentAggregate, JoinedDeclaration, PayTypeBucket, PayrollSummary, SummaryRow,
    SummaryTotals, TaxRow,
};
pub use attendance::AttendanceEntry;
pub use company::{Branch, Company, CompanyKind};
pub use effective::latest_at_or_before;
pub use employee::{Employee, FamilyStatusChange};
pub use employment::{CompensationChange, Employment, Specialty, SpecialtyCoverage};
pub use identity::{is_valid_insurance_number, is_valid_tax_id};
pub use pay_period::{PayPeriod, Period};
pub use wage::{
    round_money, WageBasis, WageSnapshot, DAILY_RATED_DAYS_PER_MONTH, DAYS_PER_WEEK,
    HOURS_PER_WEEK, SALARIED_DAYS_PER_MONTH,
};
