//! Social-security declaration encoder (Format A).
//!
//! Produces the fixed-width declaration file the social-security
//! authority ingests: one 414-character header record, then per
//! employment one 178-character identity record followed by one
//! 139-character record per (pay-type bucket × coverage line), closed by
//! a literal `EOF` line.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Company, ContributionLine, Employee, EmploymentAggregate, JoinedDeclaration, PayTypeBucket,
    Period,
};
use crate::report::fields::{decimal_flat, fill_spaces, flat_date, zero_padded};

/// The statutory kind of a social-security declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    /// The ordinary periodic declaration.
    Normal,
    /// An out-of-schedule declaration.
    Emergency,
    /// A corrected resubmission of a filed declaration.
    Resubmission,
    /// A supplementary declaration adding to a filed one.
    Supplementary,
}

impl DeclarationKind {
    /// The two-digit code carried in the header record and the archive
    /// filename.
    pub fn code(&self) -> &'static str {
        match self {
            DeclarationKind::Normal => "01",
            DeclarationKind::Emergency => "02",
            DeclarationKind::Resubmission => "03",
            DeclarationKind::Supplementary => "04",
        }
    }
}

/// Identifies one social-security declaration: the period it covers, its
/// statutory kind, and the date it is issued on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialDeclaration {
    /// The declared period.
    pub period: Period,
    /// The declaration kind.
    pub kind: DeclarationKind,
    /// The issue date written in the header.
    pub issue_date: NaiveDate,
}

/// Encodes a joined declaration as a complete Format A file.
///
/// Employments are emitted in employee display-name order, buckets in
/// pay-type-code order, and coverage lines in the order the specialty
/// lists them.
///
/// # Errors
///
/// Returns [`EngineError::EncodingError`] when a value does not fit its
/// column, and [`EngineError::CalculationError`] when the company has no
/// branch to declare for.
pub fn encode_social_declaration(
    declaration: &SocialDeclaration,
    company: &Company,
    joined: &JoinedDeclaration,
) -> EngineResult<String> {
    let mut lines = Vec::new();
    lines.push(header_record(declaration, company, joined)?);
    for entry in joined.sorted_entries() {
        lines.push(employee_record(&entry.employment.employee)?);
        for (pay_type, bucket) in &entry.buckets {
            for line in &bucket.contributions {
                lines.push(coverage_record(declaration, entry, pay_type, bucket, line)?);
            }
        }
    }
    lines.push("EOF".to_string());
    Ok(lines.join("\n"))
}

fn header_record(
    declaration: &SocialDeclaration,
    company: &Company,
    joined: &JoinedDeclaration,
) -> EngineResult<String> {
    let branch = company
        .main_branch()
        .ok_or_else(|| EngineError::CalculationError {
            message: "company has no branches".to_string(),
        })?;

    let mut days: u64 = 0;
    let mut amount = Decimal::ZERO;
    let mut contributions = Decimal::ZERO;
    for entry in joined.entries.values() {
        for bucket in entry.buckets.values() {
            days += u64::from(bucket.days);
            amount += bucket.amount;
            contributions += bucket.contribution_totals().total;
        }
    }

    let period = declaration.period;
    let mut line = String::with_capacity(414);
    line.push('1');
    line.push_str("01"); // submission medium
    line.push_str("01"); // record layout version
    line.push_str(&fill_spaces("CSL01", 8, "file code")?);
    line.push_str("01"); // software code
    line.push_str(declaration.kind.code());
    line.push_str(&zero_padded(u64::from(branch.office_code), 3, "office code")?);
    line.push_str(&fill_spaces(&branch.office_name, 50, "office name")?);
    line.push_str(&fill_spaces(&company.legal_name, 80, "legal name")?);
    line.push_str(&fill_spaces(&company.proprietor_first_name, 30, "first name")?);
    line.push_str(&fill_spaces(&company.proprietor_father_name, 30, "father name")?);
    line.push_str(&zero_padded_code(
        &company.employer_registration,
        10,
        "employer registration",
    )?);
    line.push_str(&fill_spaces(&company.tax_id, 9, "tax id")?);
    line.push_str(&fill_spaces(&branch.street, 50, "street")?);
    line.push_str(&fill_spaces(&branch.street_number, 10, "street number")?);
    line.push_str(&fill_spaces(&branch.postal_code, 5, "postal code")?);
    line.push_str(&fill_spaces(&branch.city, 30, "city")?);
    for _ in 0..2 {
        line.push_str(&period.month_code());
        line.push_str(&zero_padded(period.year() as u64, 4, "year")?);
    }
    line.push_str(&zero_padded(days, 8, "total days")?);
    line.push_str(&decimal_flat(amount, 12, "total amount")?);
    line.push_str(&decimal_flat(contributions, 12, "total contributions")?);
    line.push_str(&flat_date(Some(declaration.issue_date)));
    line.push_str(&flat_date(None)); // cessation date, always blank
    line.push_str(&fill_spaces("", 30, "trailer")?);

    debug_assert_eq!(line.chars().count(), 414);
    Ok(line)
}

fn employee_record(employee: &Employee) -> EngineResult<String> {
    let mut line = String::with_capacity(178);
    line.push('2');
    line.push_str(&zero_padded(
        u64::from(employee.registration_number),
        9,
        "registration number",
    )?);
    line.push_str(&fill_spaces(&employee.insurance_number, 11, "insurance number")?);
    line.push_str(&fill_spaces(&employee.surname, 50, "surname")?);
    line.push_str(&fill_spaces(&employee.first_name, 30, "first name")?);
    line.push_str(&fill_spaces(&employee.father_name, 30, "father name")?);
    line.push_str(&fill_spaces(&employee.mother_name, 30, "mother name")?);
    line.push_str(&flat_date(Some(employee.birth_date)));
    line.push_str(&fill_spaces(&employee.tax_id, 9, "tax id")?);

    debug_assert_eq!(line.chars().count(), 178);
    Ok(line)
}

fn coverage_record(
    declaration: &SocialDeclaration,
    entry: &EmploymentAggregate,
    pay_type: &str,
    bucket: &PayTypeBucket,
    contribution: &ContributionLine,
) -> EngineResult<String> {
    let employment = &entry.employment;
    let period = declaration.period;
    let daily_rate = employment.wage_at(period).declared_daily_rate();

    let mut line = String::with_capacity(139);
    line.push('3');
    line.push_str(&zero_padded(u64::from(employment.branch_number), 4, "branch number")?);
    line.push_str(&fill_spaces(&contribution.activity_code, 4, "activity code")?);
    line.push(if employment.full_time { '1' } else { '0' });
    line.push(if employment.all_working_days { '1' } else { '0' });
    line.push_str(&zero_padded(u64::from(bucket.holiday_days), 1, "holiday days")?);
    line.push_str(&fill_spaces(&contribution.specialty_code, 6, "specialty code")?);
    line.push_str("00");
    line.push_str(&zero_padded_code(&contribution.package, 4, "package")?);
    line.push_str(&period.month_code());
    line.push_str(&zero_padded(period.year() as u64, 4, "year")?);
    line.push_str(&flat_date(bucket.date_from));
    line.push_str(&flat_date(bucket.date_to));
    line.push_str(&fill_spaces(pay_type, 3, "pay type")?);
    line.push_str(&zero_padded(u64::from(bucket.days), 3, "days")?);
    line.push_str(&decimal_flat(daily_rate, 10, "daily rate")?);
    line.push_str(&decimal_flat(bucket.amount, 10, "amount")?);
    line.push_str(&decimal_flat(contribution.employee_share, 10, "employee share")?);
    line.push_str(&decimal_flat(contribution.employer_share, 10, "employer share")?);
    line.push_str(&decimal_flat(contribution.total, 11, "contribution total")?);
    line.push_str(&"0".repeat(10));
    line.push_str(&"0".repeat(5));
    line.push_str(&"0".repeat(10));
    line.push_str(&decimal_flat(contribution.total, 11, "contribution total")?);

    debug_assert_eq!(line.chars().count(), 139);
    Ok(line)
}

/// Left-pads a digit-string code with zeros.
fn zero_padded_code(value: &str, width: usize, field: &str) -> EngineResult<String> {
    if value.chars().count() > width {
        return Err(EngineError::EncodingError {
            field: field.to_string(),
            value: value.to_string(),
            width,
        });
    }
    Ok(format!("{value:0>width$}"))
}
