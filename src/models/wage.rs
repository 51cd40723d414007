//! Wage basis and derived pay rates.
//!
//! Greek payroll distinguishes salaried, daily-rated and hourly-rated
//! employments. All three carry one base amount; the other two rates are
//! derived from it with fixed statutory ratios: a week is 6 working days or
//! 40 working hours, a salaried month counts 25 days and a daily-rated
//! month 26.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Working days per week used for rate derivation.
pub const DAYS_PER_WEEK: u32 = 6;
/// Working hours per week used for rate derivation.
pub const HOURS_PER_WEEK: u32 = 40;
/// Days a salaried month is divided into.
pub const SALARIED_DAYS_PER_MONTH: u32 = 25;
/// Days a daily-rated month is multiplied by for a monthly equivalent.
pub const DAILY_RATED_DAYS_PER_MONTH: u32 = 26;

/// Rounds a monetary amount to 2 decimal places, half to even.
///
/// Every monetary boundary in the engine (formula results, contribution
/// shares, tax, levy) goes through this function, matching the banker's
/// rounding of the statutory arithmetic.
///
/// # Example
///
/// ```
/// use misthos_engine::models::round_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_money(Decimal::new(15015, 3)), Decimal::new(1502, 2));
/// assert_eq!(round_money(Decimal::new(2125, 3)), Decimal::new(212, 2));
/// ```
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// The closed set of wage bases an employment can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WageBasis {
    /// Paid a monthly salary.
    Salaried,
    /// Paid per working day.
    DailyRated,
    /// Paid per working hour.
    HourlyRated,
}

/// A wage effective for one period: the basis plus all three derived rates,
/// each rounded to 2 decimals.
///
/// Snapshots are immutable values; a compensation change produces a new
/// snapshot rather than mutating an old one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WageSnapshot {
    /// The basis the base amount is expressed in.
    pub basis: WageBasis,
    /// Monthly salary (or the monthly equivalent for day/hour rated).
    pub salary: Decimal,
    /// Rate per working day.
    pub daily: Decimal,
    /// Rate per working hour.
    pub hourly: Decimal,
}

impl WageSnapshot {
    /// Derives all three rates from a base amount on the given basis.
    ///
    /// # Example
    ///
    /// ```
    /// use misthos_engine::models::{WageBasis, WageSnapshot};
    /// use rust_decimal::Decimal;
    ///
    /// let wage = WageSnapshot::derive(WageBasis::Salaried, Decimal::from(1000));
    /// assert_eq!(wage.salary, Decimal::from(1000));
    /// assert_eq!(wage.daily, Decimal::from(40));
    /// assert_eq!(wage.hourly, Decimal::from(6));
    /// ```
    pub fn derive(basis: WageBasis, base: Decimal) -> Self {
        let days_per_week = Decimal::from(DAYS_PER_WEEK);
        let hours_per_week = Decimal::from(HOURS_PER_WEEK);
        match basis {
            WageBasis::Salaried => {
                let daily = base / Decimal::from(SALARIED_DAYS_PER_MONTH);
                let hourly = daily * days_per_week / hours_per_week;
                WageSnapshot {
                    basis,
                    salary: base,
                    daily: round_money(daily),
                    hourly: round_money(hourly),
                }
            }
            WageBasis::DailyRated => {
                let hourly = base * days_per_week / hours_per_week;
                let salary = base * Decimal::from(DAILY_RATED_DAYS_PER_MONTH);
                WageSnapshot {
                    basis,
                    salary: round_money(salary),
                    daily: base,
                    hourly: round_money(hourly),
                }
            }
            WageBasis::HourlyRated => {
                let daily = base * hours_per_week / days_per_week;
                let salary = daily * Decimal::from(DAILY_RATED_DAYS_PER_MONTH);
                WageSnapshot {
                    basis,
                    salary: round_money(salary),
                    daily: round_money(daily),
                    hourly: base,
                }
            }
        }
    }

    /// The daily rate as reported on the social-security declaration:
    /// filled only for daily-rated employments, zero otherwise.
    pub fn declared_daily_rate(&self) -> Decimal {
        if self.basis == WageBasis::DailyRated {
            self.daily
        } else {
            Decimal::ZERO
        }
    }
}
