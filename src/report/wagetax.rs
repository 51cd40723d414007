//! Wage-tax declaration encoder (Format B).
//!
//! Produces the fixed-width withholding file: every line is exactly 148
//! characters. A file header (type 0) and an employer record (type 1)
//! are followed by a totals record (type 2) and one record per employee
//! with a positive net payable (type 3). Unlike the social-security
//! format there is no terminator line, and a declaration with no gross
//! earnings yields no file at all.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{Company, DeclarationTotals, JoinedDeclaration, Period, TaxRow};
use crate::report::fields::{decimal_flat, fill_spaces, fill_spaces_cut, zero_padded};

/// Encodes a joined declaration as a complete Format B file.
///
/// Returns `Ok(None)` when the declaration has no positive gross
/// earnings, in which case nothing is due for filing.
///
/// # Errors
///
/// Returns [`EngineError::EncodingError`] when a structured value does
/// not fit its column, and [`EngineError::CalculationError`] when the
/// company has no branch supplying the filing address.
pub fn encode_wage_tax_declaration(
    period: Period,
    issue_date: NaiveDate,
    company: &Company,
    joined: &JoinedDeclaration,
) -> EngineResult<Option<String>> {
    if joined.totals.gross <= Decimal::ZERO {
        return Ok(None);
    }
    let mut lines = Vec::new();
    lines.push(file_record(period, issue_date)?);
    lines.push(employer_record(period, company)?);
    lines.push(totals_record(&joined.totals)?);
    for row in joined.sorted_tax_rows() {
        if row.taxable - row.tax - row.levy <= Decimal::ZERO {
            continue;
        }
        lines.push(employee_record(period, row)?);
    }
    Ok(Some(lines.join("\n")))
}

fn file_record(period: Period, issue_date: NaiveDate) -> EngineResult<String> {
    let mut line = String::with_capacity(148);
    line.push('0');
    line.push_str(&fill_spaces("JL10", 8, "file code")?);
    line.push_str(&issue_date.format("%Y%m%d").to_string());
    line.push_str(&zero_padded(period.year() as u64, 4, "year")?);
    pad_to_width(&mut line);

    debug_assert_eq!(line.chars().count(), 148);
    Ok(line)
}

fn employer_record(period: Period, company: &Company) -> EngineResult<String> {
    let branch = company
        .main_branch()
        .ok_or_else(|| EngineError::CalculationError {
            message: "company has no branches".to_string(),
        })?;

    let mut line = String::with_capacity(148);
    line.push('1');
    line.push_str(&zero_padded(period.year() as u64, 4, "year")?);
    line.push_str(&fill_spaces_cut(&company.legal_name, 18));
    line.push_str(&fill_spaces_cut(&company.proprietor_first_name, 9));
    line.push_str(&fill_spaces_cut(&company.proprietor_father_name, 3));
    line.push_str(&company.kind.code().to_string());
    line.push_str(&fill_spaces_cut(&company.tax_id, 9));
    line.push_str(&fill_spaces_cut(&company.activity, 16));
    line.push_str(&fill_spaces_cut(&branch.city, 10));
    line.push_str(&fill_spaces_cut(&branch.street, 16));
    line.push_str(&fill_spaces_cut(&branch.street_number, 5));
    line.push_str(&fill_spaces_cut(&branch.postal_code, 5));
    line.push_str(&period.month_code());
    pad_to_width(&mut line);

    debug_assert_eq!(line.chars().count(), 148);
    Ok(line)
}

fn totals_record(totals: &DeclarationTotals) -> EngineResult<String> {
    let mut line = String::with_capacity(148);
    line.push('2');
    line.push_str(&decimal_flat(totals.gross, 16, "total gross")?);
    line.push_str(&decimal_flat(totals.employee_contributions, 16, "total contributions")?);
    line.push_str(&decimal_flat(totals.taxable, 16, "total taxable")?);
    line.push_str(&"0".repeat(15));
    line.push_str(&decimal_flat(totals.tax, 15, "total tax")?);
    line.push_str(&decimal_flat(totals.levy, 15, "total levy")?);
    line.push_str(&"0".repeat(14));
    line.push_str(&"0".repeat(13));
    pad_to_width(&mut line);

    debug_assert_eq!(line.chars().count(), 148);
    Ok(line)
}

fn employee_record(period: Period, row: &TaxRow) -> EngineResult<String> {
    let employee = &row.employee;
    let children = employee.children_at(period);

    let mut line = String::with_capacity(148);
    line.push('3');
    line.push_str(&fill_spaces(&employee.tax_id, 9, "tax id")?);
    line.push(' ');
    line.push_str(&fill_spaces_cut(&employee.surname, 18));
    line.push_str(&fill_spaces_cut(&employee.first_name, 9));
    line.push_str(&fill_spaces_cut(&employee.father_name, 3));
    line.push_str(&fill_spaces(&employee.insurance_number, 11, "insurance number")?);
    line.push_str(&zero_padded(u64::from(children), 2, "children")?);
    line.push_str("01");
    line.push_str(&decimal_flat(row.gross, 11, "gross")?);
    line.push_str(&decimal_flat(row.employee_contributions, 10, "contributions")?);
    line.push_str(&decimal_flat(row.taxable, 11, "taxable")?);
    line.push('0');
    line.push_str("  ");
    line.push_str("00");
    line.push_str("00000");
    line.push_str(&decimal_flat(row.tax, 10, "tax")?);
    line.push_str(&decimal_flat(row.levy, 10, "levy")?);
    line.push_str(&"0".repeat(9));
    line.push_str(&"0".repeat(8));
    line.push_str("0000");
    pad_to_width(&mut line);

    debug_assert_eq!(line.chars().count(), 148);
    Ok(line)
}

/// Space-fills a partially built line up to the 148-character width.
fn pad_to_width(line: &mut String) {
    for _ in line.chars().count()..148 {
        line.push(' ');
    }
}
