//! Income tax and solidarity levy calculation.
//!
//! Implements the post-2020 progressive schedule: four 10000-unit brackets
//! at 9/22/28/36 percent with a 44 percent top rate, a child-dependent
//! deduction that phases out above 12000 of annual income, and the
//! solidarity levy bands. Period amounts are annualized with the run
//! type's factor, taxed annually and scaled back.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::round_money;

/// The first year the bracket schedule applies to.
pub const MIN_TAX_YEAR: i32 = 2020;

/// Annual income threshold above which the child deduction phases out and
/// the solidarity levy starts.
const PHASE_OUT_FLOOR: u32 = 12_000;

/// One bracket of the progressive schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxBracket {
    /// Upper bound of the bracket; `None` for the open-ended top bracket.
    pub upper: Option<Decimal>,
    /// Marginal rate in percent.
    pub rate_pct: Decimal,
}

/// Tax and levy withheld together.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TaxAssessment {
    /// Income tax.
    pub tax: Decimal,
    /// Solidarity levy.
    pub levy: Decimal,
}

/// Returns the bracket schedule for a year.
///
/// # Errors
///
/// Years before [`MIN_TAX_YEAR`] have no supported schedule and fail with
/// [`EngineError::InvalidConfiguration`].
pub fn brackets_for_year(year: i32) -> EngineResult<Vec<TaxBracket>> {
    if year < MIN_TAX_YEAR {
        return Err(EngineError::InvalidConfiguration {
            message: format!("no tax bracket schedule for year {year}; supported from {MIN_TAX_YEAR}"),
        });
    }
    Ok(vec![
        TaxBracket {
            upper: Some(Decimal::from(10_000)),
            rate_pct: Decimal::from(9),
        },
        TaxBracket {
            upper: Some(Decimal::from(20_000)),
            rate_pct: Decimal::from(22),
        },
        TaxBracket {
            upper: Some(Decimal::from(30_000)),
            rate_pct: Decimal::from(28),
        },
        TaxBracket {
            upper: Some(Decimal::from(40_000)),
            rate_pct: Decimal::from(36),
        },
        TaxBracket {
            upper: None,
            rate_pct: Decimal::from(44),
        },
    ])
}

/// Splits an annual amount over the brackets and sums the marginal tax,
/// rounding once at the end.
fn bracket_tax(brackets: &[TaxBracket], taxable: Decimal) -> Decimal {
    let mut tax = Decimal::ZERO;
    let mut lower = Decimal::ZERO;
    for bracket in brackets {
        let ceiling = bracket.upper.unwrap_or(taxable);
        let slice = (taxable.min(ceiling) - lower).max(Decimal::ZERO);
        tax += slice * bracket.rate_pct / Decimal::ONE_HUNDRED;
        if let Some(upper) = bracket.upper {
            lower = upper;
        }
    }
    round_money(tax)
}

/// The child-dependent deduction for an annual income.
///
/// Base amounts are 777 / 810 / 900 for zero, one and two children and
/// 900 + 220 per further child. Below five children the base shrinks by 20
/// for every full 1000 of income above 12000, never below zero; five or
/// more children keep the full base.
pub fn child_deduction(children: u32, annual_income: Decimal) -> Decimal {
    let base = match children {
        0 => 777,
        1 => 810,
        2 => 900,
        n => 900 + 220 * (n - 2),
    };
    let mut deduction = Decimal::from(base);
    let floor = Decimal::from(PHASE_OUT_FLOOR);
    if children < 5 && annual_income > floor {
        let thousands = ((annual_income - floor) / Decimal::from(1_000)).floor();
        deduction -= thousands * Decimal::from(20);
        if deduction < Decimal::ZERO {
            deduction = Decimal::ZERO;
        }
    }
    round_money(deduction)
}

/// The solidarity levy for an annual income.
///
/// Band offsets are precomputed: each constant is the levy accumulated at
/// the band's lower edge.
pub fn solidarity_levy(annual_income: Decimal) -> Decimal {
    let x = annual_income;
    let levy = if x <= Decimal::from(12_000) {
        Decimal::ZERO
    } else if x <= Decimal::from(20_000) {
        (x - Decimal::from(12_000)) * Decimal::new(22, 1) / Decimal::ONE_HUNDRED
    } else if x <= Decimal::from(30_000) {
        Decimal::from(176) + (x - Decimal::from(20_000)) * Decimal::from(5) / Decimal::ONE_HUNDRED
    } else if x <= Decimal::from(40_000) {
        Decimal::from(676) + (x - Decimal::from(30_000)) * Decimal::new(65, 1) / Decimal::ONE_HUNDRED
    } else if x <= Decimal::from(65_000) {
        Decimal::from(1_326) + (x - Decimal::from(40_000)) * Decimal::new(75, 1) / Decimal::ONE_HUNDRED
    } else if x <= Decimal::from(220_000) {
        Decimal::from(3_201) + (x - Decimal::from(65_000)) * Decimal::from(9) / Decimal::ONE_HUNDRED
    } else {
        Decimal::from(17_151)
            + (x - Decimal::from(220_000)) * Decimal::from(10) / Decimal::ONE_HUNDRED
    };
    round_money(levy)
}

/// Computes the annual tax and levy.
///
/// # Errors
///
/// Rejects negative income with [`EngineError::CalculationError`] and
/// unsupported years with [`EngineError::InvalidConfiguration`].
pub fn annual_tax(year: i32, annual_taxable: Decimal, children: u32) -> EngineResult<TaxAssessment> {
    if annual_taxable < Decimal::ZERO {
        return Err(EngineError::CalculationError {
            message: format!("annual taxable amount {annual_taxable} is negative"),
        });
    }
    let brackets = brackets_for_year(year)?;
    let gross_tax = bracket_tax(&brackets, annual_taxable);
    let deduction = child_deduction(children, annual_taxable);
    let tax = (gross_tax - deduction).max(Decimal::ZERO);
    Ok(TaxAssessment {
        tax: round_money(tax),
        levy: solidarity_levy(annual_taxable),
    })
}

/// Computes the tax and levy withheld for one period.
///
/// The period amount is annualized with the run type's factor, assessed
/// annually, and both amounts are scaled back to the period and rounded.
pub fn period_tax(
    year: i32,
    period_taxable: Decimal,
    children: u32,
    factor: Decimal,
) -> EngineResult<TaxAssessment> {
    if factor <= Decimal::ZERO {
        return Err(EngineError::CalculationError {
            message: format!("annualization factor {factor} must be positive"),
        });
    }
    let annual = annual_tax(year, period_taxable * factor, children)?;
    Ok(TaxAssessment {
        tax: round_money(annual.tax / factor),
        levy: round_money(annual.levy / factor),
    })
}
