//! Payroll aggregation.
//!
//! Turns raw attendance into declared amounts in three stages. Stage A
//! filters entries to the pay period and groups them by employment and
//! presence type, summing quantities. Stage B prices each group with the
//! earnings formula configured for its presence type, wage basis and run
//! type, accumulating amounts and day counts into per-employment pay-type
//! buckets. Stage C splits every bucket's amount into contribution shares,
//! one line per coverage assignment of the employment's specialty.
//!
//! A missing formula is an operational gap, not a fatal error: the group
//! is skipped and a warning recorded. A missing contribution rate aborts
//! the run, since the declaration cannot be assembled without it.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::warn;
use uuid::Uuid;

use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    round_money, AggregationResult, AttendanceEntry, ContributionLine, ContributionTotals,
    EmploymentAggregate, Employment, PayPeriod, PayTypeBucket, PayrollSummary, SummaryRow,
    SummaryTotals,
};

use super::contributions::split_contribution;
use super::tax::{period_tax, TaxAssessment};

/// One attendance group: summed quantity plus the covered date range.
struct AttendanceGroup {
    quantity: u32,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
}

/// Aggregates one payroll run.
///
/// # Arguments
///
/// * `period` - The pay period being run
/// * `attendance` - Attendance entries; entries outside the period are ignored
/// * `employments` - The employments attendance may reference
/// * `config` - The loaded payroll configuration
///
/// # Errors
///
/// Fails with [`EngineError::InvalidPeriod`] when a regular run spans more
/// than one month, [`EngineError::EmploymentNotFound`] when attendance
/// references an unknown employment, and [`EngineError::RateNotFound`]
/// when a coverage package has no rate for the period.
pub fn aggregate(
    period: &PayPeriod,
    attendance: &[AttendanceEntry],
    employments: &[Employment],
    config: &PayrollConfig,
) -> EngineResult<AggregationResult> {
    let run = config.run_type(&period.run_type)?;
    if run.regular && !period.is_single_month() {
        return Err(EngineError::InvalidPeriod {
            message: format!(
                "run type '{}' covers one month but the period spans months {:02}-{:02}",
                period.run_type, period.from_month, period.to_month
            ),
        });
    }

    let by_id: HashMap<&str, &Employment> =
        employments.iter().map(|e| (e.id.as_str(), e)).collect();

    // Stage A: group by (employment, presence type).
    let mut groups: BTreeMap<(String, String), AttendanceGroup> = BTreeMap::new();
    for entry in attendance {
        if !period.covers(entry.period) {
            continue;
        }
        if !by_id.contains_key(entry.employment_id.as_str()) {
            return Err(EngineError::EmploymentNotFound {
                id: entry.employment_id.clone(),
            });
        }
        let group = groups
            .entry((entry.employment_id.clone(), entry.presence_type.clone()))
            .or_insert_with(|| AttendanceGroup {
                quantity: 0,
                date_from: None,
                date_to: None,
            });
        group.quantity += entry.quantity;
        if run.regular {
            group.date_from = merge_min(group.date_from, entry.date_from);
            group.date_to = merge_max(group.date_to, entry.date_to);
        }
    }

    // Stage B: price each group and accumulate into pay-type buckets.
    let declaration_period = period.period();
    let mut entries: HashMap<String, EmploymentAggregate> = HashMap::new();
    let mut warnings = Vec::new();
    for ((employment_id, presence_type), group) in &groups {
        let employment = by_id
            .get(employment_id.as_str())
            .copied()
            .ok_or_else(|| EngineError::EmploymentNotFound {
                id: employment_id.clone(),
            })?;
        let basis = employment.wage_basis_at(declaration_period);
        let Some(formula) = config.formula(presence_type, basis, &period.run_type) else {
            warn!(
                employment = %employment_id,
                presence_type = %presence_type,
                wage_basis = ?basis,
                run_type = %period.run_type,
                "no earnings formula configured; attendance group skipped"
            );
            warnings.push(format!(
                "no earnings formula for presence type '{presence_type}' (wage basis {basis:?}, \
                 run type '{}'); skipped {} units for employment '{employment_id}'",
                period.run_type, group.quantity
            ));
            continue;
        };
        let wage = employment.wage_at(declaration_period);
        let amount = round_money(
            formula
                .formula
                .evaluate(&wage, Decimal::from(group.quantity))?,
        );
        if amount == Decimal::ZERO {
            continue;
        }
        let aggregate = entries
            .entry(employment_id.clone())
            .or_insert_with(|| EmploymentAggregate {
                employment: employment.clone(),
                buckets: BTreeMap::new(),
            });
        let bucket = aggregate
            .buckets
            .entry(formula.pay_type.clone())
            .or_default();
        bucket.amount += amount;
        if formula.counts_days {
            bucket.days += group.quantity;
        }
        if formula.counts_holiday_days {
            bucket.holiday_days += group.quantity;
        }
        bucket.date_from = merge_min(bucket.date_from, group.date_from);
        bucket.date_to = merge_max(bucket.date_to, group.date_to);
    }

    // Stage C: contribution lines per coverage assignment.
    for aggregate in entries.values_mut() {
        let coverages = &aggregate.employment.specialty.coverages;
        for bucket in aggregate.buckets.values_mut() {
            for coverage in coverages {
                let rate = config
                    .rates()
                    .contribution_rate(&coverage.package, declaration_period)?;
                let split = split_contribution(bucket.amount, rate.employee_pct, rate.total_pct);
                bucket.contributions.push(ContributionLine {
                    activity_code: coverage.activity_code.clone(),
                    specialty_code: coverage.specialty_code.clone(),
                    package: coverage.package.clone(),
                    employee_share: split.employee,
                    employer_share: split.employer,
                    total: split.total,
                });
            }
        }
    }

    Ok(AggregationResult {
        period: period.clone(),
        entries,
        warnings,
    })
}

/// Produces the per-employee tax summary of an aggregated run.
///
/// Gross, insured days and contributions are summed over payable pay
/// types only; non-payable buckets are declared for coverage but carry no
/// money to the employee. Taxable pay is gross minus the employee
/// contribution share, and tax and levy are withheld through the run
/// type's annualization factor. A non-positive taxable amount yields zero
/// tax and levy.
pub fn summarize(
    aggregation: &AggregationResult,
    config: &PayrollConfig,
) -> EngineResult<PayrollSummary> {
    let run = config.run_type(&aggregation.period.run_type)?;
    let declaration_period = aggregation.period.period();
    let year = aggregation.period.year;

    let mut rows = Vec::new();
    let mut totals = SummaryTotals::default();
    for aggregate in aggregation.sorted_entries() {
        let employment = &aggregate.employment;
        let mut gross = Decimal::ZERO;
        let mut days = 0u32;
        let mut contributions = ContributionTotals::default();
        for (code, bucket) in &aggregate.buckets {
            if !config.pay_type(code)?.payable {
                continue;
            }
            gross += bucket.amount;
            days += bucket.days;
            let bucket_totals = bucket.contribution_totals();
            contributions.employee += bucket_totals.employee;
            contributions.employer += bucket_totals.employer;
            contributions.total += bucket_totals.total;
        }

        let taxable = gross - contributions.employee;
        let children = employment.employee.children_at(declaration_period);
        let assessment = if taxable > Decimal::ZERO {
            period_tax(year, taxable, children, run.annualization_factor)?
        } else {
            TaxAssessment::default()
        };
        let row = SummaryRow {
            employment_id: employment.id.clone(),
            tax_id: employment.employee.tax_id.clone(),
            display_name: employment.employee.display_name(),
            daily_rate: employment.wage_at(declaration_period).declared_daily_rate(),
            days,
            gross,
            employee_contributions: contributions.employee,
            employer_contributions: contributions.employer,
            total_contributions: contributions.total,
            taxable,
            children,
            tax: assessment.tax,
            levy: assessment.levy,
            net: taxable - assessment.tax - assessment.levy,
        };
        totals.days += row.days;
        totals.gross += row.gross;
        totals.employee_contributions += row.employee_contributions;
        totals.employer_contributions += row.employer_contributions;
        totals.total_contributions += row.total_contributions;
        totals.taxable += row.taxable;
        totals.tax += row.tax;
        totals.levy += row.levy;
        totals.net += row.net;
        rows.push(row);
    }

    Ok(PayrollSummary {
        id: Uuid::new_v4(),
        period: aggregation.period.clone(),
        rows,
        totals,
        warnings: aggregation.warnings.clone(),
    })
}

fn merge_min(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Option<NaiveDate> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (x, y) => x.or(y),
    }
}

fn merge_max(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Option<NaiveDate> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.max(y)),
        (x, y) => x.or(y),
    }
}
