//! Period joining.
//!
//! A statutory declaration usually covers several payroll runs: the
//! regular months of a quarter, or a regular month plus a bonus run.
//! Joining merges the per-run aggregation results into one declaration
//! input, accumulating per-employee withholding figures by tax ID.
//!
//! A run whose total net payable is not positive is excluded from the
//! declaration entirely. The same employment and pay type arriving from
//! two runs is a data-integrity failure, not a merge.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use tracing::warn;

use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AggregationResult, DeclarationTotals, EmploymentAggregate, JoinedDeclaration, TaxRow,
};

use super::aggregate::summarize;

/// Merges aggregated runs into one declaration input.
///
/// # Errors
///
/// Fails with [`EngineError::DuplicateEntry`] when the same employment
/// and pay type combination arrives from two runs, and propagates
/// summarization errors.
pub fn join(
    aggregations: &[AggregationResult],
    config: &PayrollConfig,
) -> EngineResult<JoinedDeclaration> {
    let mut joined = JoinedDeclaration {
        entries: HashMap::new(),
        tax_rows: HashMap::new(),
        totals: DeclarationTotals::default(),
        warnings: Vec::new(),
    };

    for aggregation in aggregations {
        let summary = summarize(aggregation, config)?;
        if summary.totals.net <= Decimal::ZERO {
            warn!(
                period = %aggregation.period.period(),
                run_type = %aggregation.period.run_type,
                net = %summary.totals.net,
                "run excluded from declaration"
            );
            joined.warnings.push(format!(
                "period {} run '{}' excluded: net payable {} is not positive",
                aggregation.period.period(),
                aggregation.period.run_type,
                summary.totals.net
            ));
            continue;
        }
        joined.warnings.extend(summary.warnings.iter().cloned());

        for (id, aggregate) in &aggregation.entries {
            let target = joined
                .entries
                .entry(id.clone())
                .or_insert_with(|| EmploymentAggregate {
                    employment: aggregate.employment.clone(),
                    buckets: BTreeMap::new(),
                });
            for (pay_type, bucket) in &aggregate.buckets {
                if target.buckets.contains_key(pay_type) {
                    return Err(EngineError::DuplicateEntry {
                        employment: id.clone(),
                        pay_type: pay_type.clone(),
                    });
                }
                target.buckets.insert(pay_type.clone(), bucket.clone());
            }
        }

        for row in &summary.rows {
            let aggregate = aggregation.entries.get(&row.employment_id).ok_or_else(|| {
                EngineError::CalculationError {
                    message: format!(
                        "summary row references unknown employment '{}'",
                        row.employment_id
                    ),
                }
            })?;
            let tax_row = joined
                .tax_rows
                .entry(row.tax_id.clone())
                .or_insert_with(|| TaxRow {
                    employee: aggregate.employment.employee.clone(),
                    gross: Decimal::ZERO,
                    employee_contributions: Decimal::ZERO,
                    taxable: Decimal::ZERO,
                    tax: Decimal::ZERO,
                    levy: Decimal::ZERO,
                });
            tax_row.gross += row.gross;
            tax_row.employee_contributions += row.employee_contributions;
            tax_row.taxable += row.taxable;
            tax_row.tax += row.tax;
            tax_row.levy += row.levy;

            joined.totals.gross += row.gross;
            joined.totals.employee_contributions += row.employee_contributions;
            joined.totals.tax += row.tax;
            joined.totals.levy += row.levy;
        }
    }

    joined.totals.taxable = joined.totals.gross - joined.totals.employee_contributions;
    Ok(joined)
}
