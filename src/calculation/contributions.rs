//! Social security contribution splitting.

use rust_decimal::Decimal;

use crate::models::{round_money, ContributionTotals};

/// Splits an earnings amount into employee, employer and total
/// contributions for one rate row.
///
/// The employee share and the total are each rounded from the exact
/// percentage product; the employer share is the difference, so the three
/// amounts always reconcile on the declaration.
pub fn split_contribution(
    amount: Decimal,
    employee_pct: Decimal,
    total_pct: Decimal,
) -> ContributionTotals {
    let employee = round_money(employee_pct * amount / Decimal::ONE_HUNDRED);
    let total = round_money(total_pct * amount / Decimal::ONE_HUNDRED);
    ContributionTotals {
        employee,
        employer: total - employee,
        total,
    }
}
