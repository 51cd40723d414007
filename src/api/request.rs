//! Request types for the payroll engine API.
//!
//! This module defines the JSON request structures for the summary and
//! declaration endpoints. Employments, attendance entries and company
//! data arrive as the domain models themselves; the pay-period envelope
//! is a separate request type so its month-range invariants are checked
//! by conversion rather than assumed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{AttendanceEntry, Company, Employment, PayPeriod, Period};
use crate::report::{DeclarationKind, SocialDeclaration};

/// Pay-period envelope of a payroll run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayPeriodRequest {
    /// The calendar year of the run.
    pub year: i32,
    /// First month covered (1-based, inclusive).
    pub from_month: u32,
    /// Last month covered (1-based, inclusive).
    pub to_month: u32,
    /// Code of the run type (e.g. `regular`, `christmas_bonus`).
    pub run_type: String,
    /// The date the run was issued.
    pub issue_date: NaiveDate,
}

impl TryFrom<PayPeriodRequest> for PayPeriod {
    type Error = EngineError;

    fn try_from(req: PayPeriodRequest) -> Result<Self, Self::Error> {
        PayPeriod::new(
            req.year,
            req.from_month,
            req.to_month,
            req.run_type,
            req.issue_date,
        )
    }
}

/// One payroll run inside a declaration request: its period envelope and
/// the attendance booked for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayRunRequest {
    /// The run's pay period.
    pub period: PayPeriodRequest,
    /// The attendance entries of the run.
    pub attendance: Vec<AttendanceEntry>,
}

/// Request body for the `/payroll/summary` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRequest {
    /// The pay period to aggregate.
    pub period: PayPeriodRequest,
    /// The employments attendance may reference.
    pub employments: Vec<Employment>,
    /// The attendance entries of the run.
    pub attendance: Vec<AttendanceEntry>,
}

/// Request body for the `/declarations/social` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialDeclarationRequest {
    /// The calendar year declared.
    pub year: i32,
    /// The month declared (1-based).
    pub month: u32,
    /// The statutory declaration kind.
    pub kind: DeclarationKind,
    /// The date the declaration is issued on.
    pub issue_date: NaiveDate,
    /// The filing employer.
    pub company: Company,
    /// The employments attendance may reference.
    pub employments: Vec<Employment>,
    /// The payroll runs folded into the declaration.
    pub runs: Vec<PayRunRequest>,
}

impl SocialDeclarationRequest {
    /// Builds the declaration header, validating the declared period.
    pub fn declaration(&self) -> Result<SocialDeclaration, EngineError> {
        Ok(SocialDeclaration {
            period: Period::from_parts(self.year, self.month)?,
            kind: self.kind,
            issue_date: self.issue_date,
        })
    }
}

/// Request body for the `/declarations/wage-tax` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WageTaxDeclarationRequest {
    /// The calendar year declared.
    pub year: i32,
    /// The month declared (1-based).
    pub month: u32,
    /// The date the declaration is issued on.
    pub issue_date: NaiveDate,
    /// The filing employer.
    pub company: Company,
    /// The employments attendance may reference.
    pub employments: Vec<Employment>,
    /// The payroll runs folded into the declaration.
    pub runs: Vec<PayRunRequest>,
}

impl WageTaxDeclarationRequest {
    /// The declared period, validated.
    pub fn period(&self) -> Result<Period, EngineError> {
        Period::from_parts(self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_summary_request() {
        let json = r#"{
            "period": {
                "year": 2024,
                "from_month": 3,
                "to_month": 3,
                "run_type": "regular",
                "issue_date": "2024-03-31"
            },
            "employments": [],
            "attendance": [
                {
                    "employment_id": "emp_001",
                    "period": 202403,
                    "presence_type": "worked_days",
                    "quantity": 25
                }
            ]
        }"#;

        let request: SummaryRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.period.run_type, "regular");
        assert_eq!(request.attendance.len(), 1);
        assert_eq!(request.attendance[0].quantity, 25);
    }

    #[test]
    fn test_pay_period_conversion_validates_months() {
        let req = PayPeriodRequest {
            year: 2024,
            from_month: 5,
            to_month: 2,
            run_type: "regular".to_string(),
            issue_date: NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
        };
        let result: Result<PayPeriod, _> = req.try_into();
        assert!(matches!(result, Err(EngineError::InvalidPeriod { .. })));
    }

    #[test]
    fn test_social_declaration_header_validates_month() {
        let json = r#"{
            "year": 2024,
            "month": 13,
            "kind": "normal",
            "issue_date": "2024-04-30",
            "company": {
                "legal_name": "Acme Hellas EPE",
                "tax_id": "997036671",
                "employer_registration": "1234567890",
                "activity": "Software development",
                "kind": "legal_entity",
                "branches": []
            },
            "employments": [],
            "runs": []
        }"#;

        let request: SocialDeclarationRequest = serde_json::from_str(json).unwrap();
        assert!(request.declaration().is_err());
    }

    #[test]
    fn test_declaration_kind_deserializes_snake_case() {
        let kind: DeclarationKind = serde_json::from_str("\"resubmission\"").unwrap();
        assert_eq!(kind, DeclarationKind::Resubmission);
    }
}
