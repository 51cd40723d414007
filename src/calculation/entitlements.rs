//! Statutory entitlements: seasonal bonuses, leave allowance, severance.
//!
//! These helpers price the entitlements labour law attaches to an
//! employment from its wage snapshot and qualifying service. Hourly-rated
//! employments are treated like daily-rated ones through their derived
//! daily rate.

use rust_decimal::Decimal;

use crate::models::{round_money, WageBasis, WageSnapshot};

/// Multiplier applied to seasonal bonuses for leave-allowance accrual.
fn accrual_factor() -> Decimal {
    Decimal::new(104_166, 5)
}

/// The Christmas bonus for the qualifying days of the calendar year.
///
/// Salaried employments accrue against a 237.5-day year, daily-rated ones
/// against 200 payable days; days beyond the cap earn nothing extra.
pub fn christmas_bonus(wage: &WageSnapshot, days: Decimal) -> Decimal {
    match wage.basis {
        WageBasis::Salaried => {
            let cap = Decimal::new(2375, 1);
            round_money(wage.salary * days.min(cap) / cap * accrual_factor())
        }
        WageBasis::DailyRated | WageBasis::HourlyRated => {
            let days = days.min(Decimal::from(200));
            round_money(wage.daily * days / Decimal::from(8) * accrual_factor())
        }
    }
}

/// The Easter bonus for the qualifying days of the first four months.
///
/// Salaried employments accrue against 120 days out of a 240-day divisor,
/// daily-rated ones against 97.5 days with a 6.5-day divisor.
pub fn easter_bonus(wage: &WageSnapshot, days: Decimal) -> Decimal {
    match wage.basis {
        WageBasis::Salaried => {
            let days = days.min(Decimal::from(120));
            round_money(wage.salary * days / Decimal::from(240) * accrual_factor())
        }
        WageBasis::DailyRated | WageBasis::HourlyRated => {
            let days = days.min(Decimal::new(975, 1));
            round_money(wage.daily * days / Decimal::new(65, 1) * accrual_factor())
        }
    }
}

/// The leave allowance for the qualifying days of the leave year.
///
/// Entitled days accrue at 2 per 25 qualifying days, capped at half a
/// salaried month (12.5 days) or 13 daily-rated days.
pub fn leave_allowance(wage: &WageSnapshot, qualifying_days: Decimal) -> Decimal {
    let accrued = qualifying_days / Decimal::from(25) * Decimal::from(2);
    match wage.basis {
        WageBasis::Salaried => {
            let entitled = accrued.min(Decimal::new(125, 1));
            round_money(wage.salary * entitled / Decimal::from(25))
        }
        WageBasis::DailyRated | WageBasis::HourlyRated => {
            let entitled = accrued.min(Decimal::from(13));
            round_money(wage.daily * entitled)
        }
    }
}

/// Months of salary a salaried employment is owed on dismissal, by full
/// years of service.
pub fn severance_months(years: u32) -> u32 {
    match years {
        0 => 0,
        1..=3 => 2,
        4..=5 => 3,
        6..=7 => 4,
        8..=9 => 5,
        10 => 6,
        11 => 7,
        12 => 8,
        13 => 9,
        14 => 10,
        15 => 11,
        16 => 12,
        17..=28 => years - 4,
        _ => 24,
    }
}

/// Days of wage a daily-rated employment is owed on dismissal, by full
/// years of service.
pub fn severance_days(years: u32) -> u32 {
    match years {
        0 => 0,
        1 => 7,
        2..=4 => 15,
        5..=9 => 30,
        10..=14 => 60,
        15..=19 => 100,
        20..=24 => 120,
        25..=29 => 145,
        _ => 165,
    }
}

/// The severance payment for a dismissal.
///
/// The wage rate is uplifted by 14/12 to spread the seasonal bonuses over
/// the year, multiplied by the tenure entitlement, and halved when the
/// statutory notice period was served.
pub fn severance_pay(wage: &WageSnapshot, years: u32, notice_served: bool) -> Decimal {
    let (rate, entitlement) = match wage.basis {
        WageBasis::Salaried => (wage.salary, severance_months(years)),
        WageBasis::DailyRated | WageBasis::HourlyRated => (wage.daily, severance_days(years)),
    };
    let mut amount = rate * Decimal::from(14) / Decimal::from(12) * Decimal::from(entitlement);
    if notice_served {
        amount /= Decimal::from(2);
    }
    round_money(amount)
}
