//! Fixed-width field primitives.
//!
//! The statutory file formats are fixed-width text. Widths count
//! characters, not bytes, so the encoded lines keep their widths after
//! transcoding to the single-byte legacy codepage the authorities expect.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{EngineError, EngineResult};
use crate::models::round_money;

/// Right-pads a value with spaces to the field width.
///
/// # Errors
///
/// Returns [`EngineError::EncodingError`] when the value is wider than
/// the field.
pub fn fill_spaces(value: &str, width: usize, field: &str) -> EngineResult<String> {
    let count = value.chars().count();
    if count > width {
        return Err(EngineError::EncodingError {
            field: field.to_string(),
            value: value.to_string(),
            width,
        });
    }
    let mut out = String::with_capacity(width);
    out.push_str(value);
    for _ in count..width {
        out.push(' ');
    }
    Ok(out)
}

/// Truncates a value to the field width, then right-pads with spaces.
///
/// Used for free-text fields where the format simply cuts off what does
/// not fit.
pub fn fill_spaces_cut(value: &str, width: usize) -> String {
    let mut out: String = value.chars().take(width).collect();
    let count = out.chars().count();
    for _ in count..width {
        out.push(' ');
    }
    out
}

/// Encodes a monetary amount as zero-padded digits without a separator.
///
/// The amount is rounded to exactly two decimals first, so `1234.5`
/// becomes `123450` before padding.
///
/// # Errors
///
/// Returns [`EngineError::EncodingError`] for negative amounts and for
/// amounts whose digits do not fit the field.
pub fn decimal_flat(value: Decimal, width: usize, field: &str) -> EngineResult<String> {
    let overflow = || EngineError::EncodingError {
        field: field.to_string(),
        value: value.to_string(),
        width,
    };
    let cents = (round_money(value) * Decimal::ONE_HUNDRED)
        .trunc()
        .to_i64()
        .ok_or_else(overflow)?;
    if cents < 0 {
        return Err(overflow());
    }
    let digits = cents.to_string();
    if digits.len() > width {
        return Err(overflow());
    }
    Ok(format!("{digits:0>width$}"))
}

/// Encodes an unsigned integer as zero-padded digits.
///
/// # Errors
///
/// Returns [`EngineError::EncodingError`] when the digits do not fit the
/// field.
pub fn zero_padded(value: u64, width: usize, field: &str) -> EngineResult<String> {
    let digits = value.to_string();
    if digits.len() > width {
        return Err(EngineError::EncodingError {
            field: field.to_string(),
            value: digits,
            width,
        });
    }
    Ok(format!("{digits:0>width$}"))
}

/// Encodes an optional date as `ddmmyyyy`, or 8 spaces when absent.
pub fn flat_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%d%m%Y").to_string(),
        None => " ".repeat(8),
    }
}
