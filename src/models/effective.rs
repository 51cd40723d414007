//! Effective-dated record lookup.
//!
//! Contribution rates, compensation changes and family-status changes all
//! follow the same time-slicing rule: the record in force for a period is
//! the one with the latest effective period at or before it. This module
//! implements that rule once.

use crate::models::Period;

/// Returns the record with the latest effective period at or before
/// `period`, or `None` when no record is in force yet.
///
/// The slice does not need to be sorted; ties on the effective period keep
/// the earliest record in slice order.
///
/// # Example
///
/// ```
/// use misthos_engine::models::{latest_at_or_before, Period};
///
/// let changes = [(202001, "a"), (202106, "b"), (202301, "c")];
/// let period = Period::from_parts(2022, 3).unwrap();
/// let found = latest_at_or_before(&changes, period, |c| {
///     Period::try_from(c.0).unwrap()
/// });
/// assert_eq!(found.map(|c| c.1), Some("b"));
/// ```
pub fn latest_at_or_before<T, F>(records: &[T], period: Period, effective: F) -> Option<&T>
where
    F: Fn(&T) -> Period,
{
    let mut best: Option<(&T, Period)> = None;
    for record in records {
        let from = effective(record);
        if from > period {
            continue;
        }
        match best {
            Some((_, current)) if current >= from => {}
            _ => best = Some((record, from)),
        }
    }
    best.map(|(record, _)| record)
}
