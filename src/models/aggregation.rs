//! Aggregation results: the typed output of every pipeline stage.
//!
//! This module defines the structures the aggregator, summarizer and period
//! joiner hand to the report encoders: per-employment pay-type buckets with
//! their contribution lines, the per-employee tax summary, and the joined
//! multi-period declaration input.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Employee, Employment, PayPeriod};

/// Summed contribution shares.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContributionTotals {
    /// The employee's share.
    pub employee: Decimal,
    /// The employer's share.
    pub employer: Decimal,
    /// The total contribution.
    pub total: Decimal,
}

/// One contribution line of a pay-type bucket: the shares computed for one
/// coverage assignment of the employment's specialty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionLine {
    /// Insured activity code of the assignment.
    pub activity_code: String,
    /// Specialty code of the assignment.
    pub specialty_code: String,
    /// Coverage package code the rate was looked up for.
    pub package: String,
    /// Employee share, rounded to 2 decimals.
    pub employee_share: Decimal,
    /// Employer share: always total minus employee share.
    pub employer_share: Decimal,
    /// Total contribution, rounded to 2 decimals.
    pub total: Decimal,
}

/// Accumulated earnings of one employment under one statutory pay type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PayTypeBucket {
    /// Earnings amount, rounded per formula result before accumulation.
    pub amount: Decimal,
    /// Insured days counted by day-counting formulas.
    pub days: u32,
    /// Public-holiday days counted by holiday-counting formulas.
    pub holiday_days: u32,
    /// Earliest covered date across the contributing entries.
    pub date_from: Option<NaiveDate>,
    /// Latest covered date across the contributing entries.
    pub date_to: Option<NaiveDate>,
    /// One line per coverage assignment of the employment's specialty.
    pub contributions: Vec<ContributionLine>,
}

impl PayTypeBucket {
    /// Sums the bucket's contribution lines.
    pub fn contribution_totals(&self) -> ContributionTotals {
        let mut totals = ContributionTotals::default();
        for line in &self.contributions {
            totals.employee += line.employee_share;
            totals.employer += line.employer_share;
            totals.total += line.total;
        }
        totals
    }
}

/// All pay-type buckets of one employment, keyed by pay-type code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmploymentAggregate {
    /// The employment the buckets belong to.
    pub employment: Employment,
    /// Buckets in pay-type-code order.
    pub buckets: BTreeMap<String, PayTypeBucket>,
}

/// The result of aggregating one payroll run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    /// The run that was aggregated.
    pub period: PayPeriod,
    /// Aggregates keyed by employment id.
    pub entries: HashMap<String, EmploymentAggregate>,
    /// Non-fatal observations, e.g. attendance groups skipped for lack of
    /// an earnings formula.
    pub warnings: Vec<String>,
}

impl AggregationResult {
    /// The aggregates ordered by employee display name, the order every
    /// report emits employments in.
    pub fn sorted_entries(&self) -> Vec<&EmploymentAggregate> {
        sort_by_employee(self.entries.values())
    }
}

/// One row of the payroll summary: one employment's totals for the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// The employment id.
    pub employment_id: String,
    /// The employee's tax ID.
    pub tax_id: String,
    /// Surname and first name, the report display form.
    pub display_name: String,
    /// Declared daily rate (zero unless daily-rated).
    pub daily_rate: Decimal,
    /// Insured days across payable buckets.
    pub days: u32,
    /// Gross earnings over payable pay types.
    pub gross: Decimal,
    /// Employee contribution share over payable pay types.
    pub employee_contributions: Decimal,
    /// Employer contribution share over payable pay types.
    pub employer_contributions: Decimal,
    /// Total contributions over payable pay types.
    pub total_contributions: Decimal,
    /// Taxable amount: gross minus employee contributions.
    pub taxable: Decimal,
    /// Dependent children effective in the run's period.
    pub children: u32,
    /// Withheld income tax for the period.
    pub tax: Decimal,
    /// Withheld solidarity levy for the period.
    pub levy: Decimal,
    /// Net payable: taxable minus tax minus levy.
    pub net: Decimal,
}

/// Column totals of a payroll summary.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryTotals {
    /// Total insured days.
    pub days: u32,
    /// Total gross earnings.
    pub gross: Decimal,
    /// Total employee contributions.
    pub employee_contributions: Decimal,
    /// Total employer contributions.
    pub employer_contributions: Decimal,
    /// Total contributions.
    pub total_contributions: Decimal,
    /// Total taxable amount.
    pub taxable: Decimal,
    /// Total withheld tax.
    pub tax: Decimal,
    /// Total withheld levy.
    pub levy: Decimal,
    /// Total net payable.
    pub net: Decimal,
}

/// The per-employee tax summary of one payroll run, ordered by display
/// name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollSummary {
    /// Unique identifier of this summary.
    pub id: Uuid,
    /// The summarized run.
    pub period: PayPeriod,
    /// One row per employment, ordered by employee display name.
    pub rows: Vec<SummaryRow>,
    /// Column totals.
    pub totals: SummaryTotals,
    /// Warnings carried over from aggregation.
    pub warnings: Vec<String>,
}

/// Withholding figures accumulated for one employee across joined periods,
/// keyed by tax ID in the joined declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRow {
    /// The employee, from the first employment encountered for the tax ID.
    pub employee: Employee,
    /// Accumulated gross earnings over payable pay types.
    pub gross: Decimal,
    /// Accumulated employee contributions.
    pub employee_contributions: Decimal,
    /// Accumulated taxable amount.
    pub taxable: Decimal,
    /// Accumulated withheld tax.
    pub tax: Decimal,
    /// Accumulated withheld levy.
    pub levy: Decimal,
}

/// Declaration-level totals of the joined periods.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeclarationTotals {
    /// Total gross earnings.
    pub gross: Decimal,
    /// Total employee contributions.
    pub employee_contributions: Decimal,
    /// Total taxable amount, recomputed as gross minus contributions.
    pub taxable: Decimal,
    /// Total withheld tax.
    pub tax: Decimal,
    /// Total withheld levy.
    pub levy: Decimal,
}

/// The merged input both declaration encoders read: buckets per employment
/// plus withholding rows per employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedDeclaration {
    /// Merged aggregates keyed by employment id.
    pub entries: HashMap<String, EmploymentAggregate>,
    /// Withholding rows keyed by employee tax ID.
    pub tax_rows: HashMap<String, TaxRow>,
    /// Declaration totals over the included periods.
    pub totals: DeclarationTotals,
    /// Warnings carried over from the joined runs.
    pub warnings: Vec<String>,
}

impl JoinedDeclaration {
    /// Merged aggregates ordered by employee display name.
    pub fn sorted_entries(&self) -> Vec<&EmploymentAggregate> {
        sort_by_employee(self.entries.values())
    }

    /// Withholding rows ordered by employee display name.
    pub fn sorted_tax_rows(&self) -> Vec<&TaxRow> {
        let mut rows: Vec<&TaxRow> = self.tax_rows.values().collect();
        rows.sort_by(|a, b| {
            a.employee
                .sort_key()
                .cmp(&b.employee.sort_key())
                .then_with(|| a.employee.tax_id.cmp(&b.employee.tax_id))
        });
        rows
    }
}

fn sort_by_employee<'a>(
    entries: impl Iterator<Item = &'a EmploymentAggregate>,
) -> Vec<&'a EmploymentAggregate> {
    let mut sorted: Vec<&EmploymentAggregate> = entries.collect();
    sorted.sort_by(|a, b| {
        a.employment
            .employee
            .sort_key()
            .cmp(&b.employment.employee.sort_key())
            .then_with(|| a.employment.id.cmp(&b.employment.id))
    });
    sorted
}
