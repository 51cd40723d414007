//! End-to-end tests for the payroll engine API.
//!
//! This test suite covers the full request-to-file pipeline:
//! - Monthly payroll summary for salaried employments
//! - Child deductions and the public-holiday premium
//! - Daily-rated employments and skipped attendance
//! - Social-security declaration download (Format A archive)
//! - Wage-tax declaration download (Format B archive)
//! - Joined regular and bonus runs in one declaration
//! - Error cases
//! - Response field validation

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::io::{Cursor, Read};
use std::str::FromStr;
use tower::ServiceExt;
use zip::ZipArchive;

use misthos_engine::api::{create_router, AppState};
use misthos_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/efka").expect("Failed to load config");
    AppState::new(config)
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

/// Normalize decimal string by removing trailing zeros after decimal point
fn normalize_decimal(s: &str) -> String {
    Decimal::from_str(s).unwrap().normalize().to_string()
}

fn assert_amount(value: &Value, expected: &str) {
    let actual = value.as_str().unwrap();
    assert_eq!(
        normalize_decimal(actual),
        normalize_decimal(expected),
        "Expected amount {}, got {}",
        expected,
        actual
    );
}

async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Posts a declaration request and returns the attachment filename plus
/// the raw archive bytes, asserting the zip download headers.
async fn post_archive(router: Router, uri: &str, body: Value) -> (String, Vec<u8>) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/zip"
    );
    let disposition = response
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..2], b"PK");

    (disposition, bytes.to_vec())
}

/// Extracts the named entry from a declaration archive and decodes it
/// from the legacy Greek codepage.
fn unpack_entry(bytes: &[u8], entry_name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    let mut entry = archive.by_name(entry_name).unwrap();
    let mut raw = Vec::new();
    entry.read_to_end(&mut raw).unwrap();
    let (decoded, _, had_errors) = encoding_rs::WINDOWS_1253.decode(&raw);
    assert!(!had_errors);
    decoded.into_owned()
}

fn employment_json(
    id: &str,
    surname: &str,
    first_name: &str,
    tax_id: &str,
    insurance_number: &str,
    registration: u32,
    wage_basis: &str,
    base_compensation: &str,
) -> Value {
    json!({
        "id": id,
        "employee": {
            "registration_number": registration,
            "insurance_number": insurance_number,
            "tax_id": tax_id,
            "surname": surname,
            "first_name": first_name,
            "father_name": "Georgios",
            "mother_name": "Maria",
            "birth_date": "1980-01-01"
        },
        "branch_number": 0,
        "specialty": {
            "name": "Office clerk",
            "coverages": [{
                "activity_code": "6201",
                "specialty_code": "411100",
                "package": "0101"
            }]
        },
        "full_time": true,
        "all_working_days": true,
        "wage_basis": wage_basis,
        "base_compensation": base_compensation,
        "start_date": "2022-01-01"
    })
}

fn salaried_employment(id: &str) -> Value {
    employment_json(
        id,
        "Papadopoulou",
        "Eleni",
        "090000045",
        "01018047595",
        1234567,
        "salaried",
        "1000",
    )
}

fn daily_rated_employment(id: &str) -> Value {
    employment_json(
        id,
        "Alexiou",
        "Nikos",
        "106807530",
        "15058570126",
        7654321,
        "daily_rated",
        "45.50",
    )
}

fn attendance_json(employment_id: &str, period: u32, presence_type: &str, quantity: u32) -> Value {
    json!({
        "employment_id": employment_id,
        "period": period,
        "presence_type": presence_type,
        "quantity": quantity
    })
}

fn dated_attendance_json(
    employment_id: &str,
    period: u32,
    presence_type: &str,
    quantity: u32,
    date_from: &str,
    date_to: &str,
) -> Value {
    json!({
        "employment_id": employment_id,
        "period": period,
        "presence_type": presence_type,
        "quantity": quantity,
        "date_from": date_from,
        "date_to": date_to
    })
}

fn period_json(year: i32, from_month: u32, to_month: u32, run_type: &str, issue_date: &str) -> Value {
    json!({
        "year": year,
        "from_month": from_month,
        "to_month": to_month,
        "run_type": run_type,
        "issue_date": issue_date
    })
}

fn march_period() -> Value {
    period_json(2024, 3, 3, "regular", "2024-03-31")
}

fn company_json() -> Value {
    json!({
        "legal_name": "Acme Hellas EPE",
        "tax_id": "997036671",
        "employer_registration": "1234567890",
        "activity": "Software development",
        "kind": "legal_entity",
        "branches": [{
            "number": 0,
            "office_code": 101,
            "office_name": "Athens Central",
            "name": "Headquarters",
            "street": "Stadiou",
            "street_number": "10",
            "postal_code": "10564",
            "city": "Athens"
        }]
    })
}

fn summary_request(employments: Vec<Value>, attendance: Vec<Value>) -> Value {
    json!({
        "period": march_period(),
        "employments": employments,
        "attendance": attendance
    })
}

// =============================================================================
// SECTION 1: Monthly Payroll Summary (Salaried) - 4 tests
// =============================================================================

#[tokio::test]
async fn test_salaried_full_month() {
    // Salary 1000, 25 worked days: 1000 * 25 / 25 = 1000.00 gross
    // Employee contributions at 14.12%: 141.20, taxable 858.80
    // Annualized 858.80 * 14 = 12023.20 lands in the 22% bracket:
    // (900 + 2023.20 * 0.22 - 777) / 14 = 40.58 tax
    // Levy band above 12000: 23.20 * 0.022 / 14 = 0.04
    // Net: 858.80 - 40.58 - 0.04 = 818.18
    let router = create_router_for_test();
    let request = summary_request(
        vec![salaried_employment("emp_001")],
        vec![attendance_json("emp_001", 202403, "worked_days", 25)],
    );

    let (status, result) = post_json(router, "/payroll/summary", request).await;

    assert_eq!(status, StatusCode::OK);
    let rows = result["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["days"].as_u64().unwrap(), 25);
    assert_amount(&rows[0]["gross"], "1000.00");
    assert_amount(&rows[0]["employee_contributions"], "141.20");
    assert_amount(&rows[0]["taxable"], "858.80");
    assert_amount(&rows[0]["tax"], "40.58");
    assert_amount(&rows[0]["levy"], "0.04");
    assert_amount(&rows[0]["net"], "818.18");
}

#[tokio::test]
async fn test_salaried_with_two_children() {
    // Same earnings as the full month, but the family deduction for two
    // children is 900 instead of 777:
    // (1345.10 - 900) / 14 = 31.79 tax
    // Net: 858.80 - 31.79 - 0.04 = 826.97
    let router = create_router_for_test();
    let mut employment = salaried_employment("emp_001");
    employment["employee"]["family_changes"] = json!([
        { "effective": 202001, "children": 2 }
    ]);
    let request = summary_request(
        vec![employment],
        vec![attendance_json("emp_001", 202403, "worked_days", 25)],
    );

    let (status, result) = post_json(router, "/payroll/summary", request).await;

    assert_eq!(status, StatusCode::OK);
    let row = &result["rows"][0];
    assert_eq!(row["children"].as_u64().unwrap(), 2);
    assert_amount(&row["tax"], "31.79");
    assert_amount(&row["net"], "826.97");
}

#[tokio::test]
async fn test_salaried_public_holiday_premium() {
    // 24 worked days plus one public holiday. The holiday pays the 75%
    // uplift on the daily rate (1000 / 25 = 40.00):
    // 960.00 + 40.00 * 0.75 = 990.00 gross over 25 insured days
    // Contributions: 990.00 * 14.12% = 139.79, taxable 850.21
    // Annualized 11902.94 stays under the levy floor, so levy is zero
    let router = create_router_for_test();
    let request = summary_request(
        vec![salaried_employment("emp_001")],
        vec![
            attendance_json("emp_001", 202403, "worked_days", 24),
            attendance_json("emp_001", 202403, "public_holiday", 1),
        ],
    );

    let (status, result) = post_json(router, "/payroll/summary", request).await;

    assert_eq!(status, StatusCode::OK);
    let row = &result["rows"][0];
    assert_eq!(row["days"].as_u64().unwrap(), 25);
    assert_amount(&row["gross"], "990.00");
    assert_amount(&row["employee_contributions"], "139.79");
    assert_amount(&row["tax"], "38.69");
    assert_amount(&row["levy"], "0");
    assert_amount(&row["net"], "811.52");
}

#[tokio::test]
async fn test_summary_totals_accumulate_over_rows() {
    // Papadopoulou: 1000.00 gross, 818.18 net (salaried full month)
    // Alexiou: 45.50 * 22 = 1001.00 gross, 818.83 net (daily-rated)
    // Rows come back ordered by display name, Alexiou first
    let router = create_router_for_test();
    let request = summary_request(
        vec![
            salaried_employment("emp_001"),
            daily_rated_employment("emp_002"),
        ],
        vec![
            attendance_json("emp_001", 202403, "worked_days", 25),
            attendance_json("emp_002", 202403, "worked_days", 22),
        ],
    );

    let (status, result) = post_json(router, "/payroll/summary", request).await;

    assert_eq!(status, StatusCode::OK);
    let rows = result["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["display_name"], "Alexiou Nikos");
    assert_eq!(rows[1]["display_name"], "Papadopoulou Eleni");

    let totals = &result["totals"];
    assert_eq!(totals["days"].as_u64().unwrap(), 47);
    assert_amount(&totals["gross"], "2001.00");
    assert_amount(&totals["employee_contributions"], "282.54");
    assert_amount(&totals["taxable"], "1718.46");
    assert_amount(&totals["tax"], "81.35");
    assert_amount(&totals["levy"], "0.10");
    assert_amount(&totals["net"], "1637.01");
}

// =============================================================================
// SECTION 2: Daily-Rated and Skipped Attendance - 2 tests
// =============================================================================

#[tokio::test]
async fn test_daily_rated_month() {
    // Daily rate 45.50 over 22 days: 1001.00 gross
    // Contributions: 1001.00 * 14.12% = 141.34, taxable 859.66
    // Annualized 12035.24: tax (1347.75 - 777) / 14 = 40.77,
    // levy 35.24 * 0.022 / 14 = 0.06
    let router = create_router_for_test();
    let request = summary_request(
        vec![daily_rated_employment("emp_002")],
        vec![attendance_json("emp_002", 202403, "worked_days", 22)],
    );

    let (status, result) = post_json(router, "/payroll/summary", request).await;

    assert_eq!(status, StatusCode::OK);
    let row = &result["rows"][0];
    assert_eq!(row["days"].as_u64().unwrap(), 22);
    assert_amount(&row["daily_rate"], "45.50");
    assert_amount(&row["gross"], "1001.00");
    assert_amount(&row["employee_contributions"], "141.34");
    assert_amount(&row["taxable"], "859.66");
    assert_amount(&row["tax"], "40.77");
    assert_amount(&row["levy"], "0.06");
    assert_amount(&row["net"], "818.83");
}

#[tokio::test]
async fn test_unpriced_presence_type_is_skipped_with_warning() {
    // No formula prices overtime hours on a regular salaried run; the
    // group is dropped and reported, the rest of the run is unaffected
    let router = create_router_for_test();
    let request = summary_request(
        vec![salaried_employment("emp_001")],
        vec![
            attendance_json("emp_001", 202403, "worked_days", 25),
            attendance_json("emp_001", 202403, "overtime_hours", 10),
        ],
    );

    let (status, result) = post_json(router, "/payroll/summary", request).await;

    assert_eq!(status, StatusCode::OK);
    let row = &result["rows"][0];
    assert_amount(&row["gross"], "1000.00");

    let warnings = result["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    let warning = warnings[0].as_str().unwrap();
    assert!(warning.contains("overtime_hours"));
    assert!(warning.contains("emp_001"));
}

// =============================================================================
// SECTION 3: Social-Security Declaration Download - 3 tests
// =============================================================================

#[tokio::test]
async fn test_social_declaration_covers_all_employments() {
    // March run for both employments. 25 + 22 = 47 insured days,
    // 1000.00 + 1001.00 = 2001.00 declared earnings, and contributions
    // at the 36.66% total rate: 366.60 + 366.97 = 733.57
    let router = create_router_for_test();
    let request = json!({
        "year": 2024,
        "month": 3,
        "kind": "normal",
        "issue_date": "2024-04-30",
        "company": company_json(),
        "employments": [
            salaried_employment("emp_001"),
            daily_rated_employment("emp_002")
        ],
        "runs": [{
            "period": march_period(),
            "attendance": [
                dated_attendance_json("emp_001", 202403, "worked_days", 25, "2024-03-01", "2024-03-29"),
                dated_attendance_json("emp_002", 202403, "worked_days", 22, "2024-03-01", "2024-03-29")
            ]
        }]
    });

    let (disposition, bytes) = post_archive(router, "/declarations/social", request).await;
    assert!(disposition.contains("apd-202403-01.zip"));

    let text = unpack_entry(&bytes, "CSL01");
    let lines: Vec<&str> = text.split('\n').collect();
    assert_eq!(lines.len(), 6);

    // header: office, declared period written twice, then the totals
    let header = lines[0];
    assert_eq!(&header[15..17], "01");
    assert_eq!(&header[17..20], "101");
    assert_eq!(&header[324..336], "032024032024");
    assert_eq!(&header[336..344], "00000047");
    assert_eq!(&header[344..356], "000000200100");
    assert_eq!(&header[356..368], "000000073357");
    assert_eq!(&header[368..376], "30042024");

    // employments ordered by display name, Alexiou before Papadopoulou
    assert!(lines[1].starts_with('2'));
    assert!(lines[1].contains("Alexiou"));
    assert_eq!(&lines[1][1..10], "007654321");
    assert_eq!(&lines[1][10..21], "15058570126");

    // Alexiou's coverage line carries the declared daily rate
    let coverage = lines[2];
    assert!(coverage.starts_with('3'));
    assert_eq!(&coverage[24..30], "032024");
    assert_eq!(&coverage[30..46], "0103202429032024");
    assert_eq!(&coverage[46..49], "01 ");
    assert_eq!(&coverage[49..52], "022");
    assert_eq!(&coverage[52..62], "0000004550");
    assert_eq!(&coverage[62..72], "0000100100");
    assert_eq!(&coverage[72..82], "0000014134");
    assert_eq!(&coverage[82..92], "0000022563");
    assert_eq!(&coverage[92..103], "00000036697");

    // salaried employments declare no daily rate
    assert!(lines[3].contains("Papadopoulou"));
    assert_eq!(&lines[4][52..62], "0000000000");
    assert_eq!(&lines[4][62..72], "0000100000");

    assert_eq!(lines[5], "EOF");
}

#[tokio::test]
async fn test_social_declaration_resubmission_kind() {
    // A resubmission carries kind code 03 in the header and the filename
    let router = create_router_for_test();
    let request = json!({
        "year": 2024,
        "month": 3,
        "kind": "resubmission",
        "issue_date": "2024-04-30",
        "company": company_json(),
        "employments": [salaried_employment("emp_001")],
        "runs": [{
            "period": march_period(),
            "attendance": [attendance_json("emp_001", 202403, "worked_days", 25)]
        }]
    });

    let (disposition, bytes) = post_archive(router, "/declarations/social", request).await;
    assert!(disposition.contains("apd-202403-03.zip"));

    let text = unpack_entry(&bytes, "CSL01");
    let header = text.split('\n').next().unwrap();
    assert_eq!(&header[15..17], "03");
}

#[tokio::test]
async fn test_social_declaration_without_runs_still_files() {
    // Unlike the wage-tax declaration, an empty social-security file is
    // still due: header with zero totals, then the terminator
    let router = create_router_for_test();
    let request = json!({
        "year": 2024,
        "month": 3,
        "kind": "normal",
        "issue_date": "2024-04-30",
        "company": company_json(),
        "employments": [],
        "runs": []
    });

    let (_, bytes) = post_archive(router, "/declarations/social", request).await;
    let text = unpack_entry(&bytes, "CSL01");
    let lines: Vec<&str> = text.split('\n').collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(&lines[0][336..344], "00000000");
    assert_eq!(&lines[0][344..356], "000000000000");
    assert_eq!(&lines[0][356..368], "000000000000");
    assert_eq!(lines[1], "EOF");
}

// =============================================================================
// SECTION 4: Wage-Tax Declaration Download - 3 tests
// =============================================================================

#[tokio::test]
async fn test_wage_tax_declaration_single_run() {
    // One salaried March run: 1000.00 gross, 141.20 contributions,
    // 858.80 taxable, 40.58 tax, 0.04 levy
    let router = create_router_for_test();
    let request = json!({
        "year": 2024,
        "month": 3,
        "issue_date": "2024-04-30",
        "company": company_json(),
        "employments": [salaried_employment("emp_001")],
        "runs": [{
            "period": march_period(),
            "attendance": [attendance_json("emp_001", 202403, "worked_days", 25)]
        }]
    });

    let (disposition, bytes) = post_archive(router, "/declarations/wage-tax", request).await;
    assert!(disposition.contains("fmy-202403.zip"));

    let text = unpack_entry(&bytes, "JL10");
    let lines: Vec<&str> = text.split('\n').collect();
    assert_eq!(lines.len(), 4);
    for line in &lines {
        assert_eq!(line.chars().count(), 148);
    }

    assert_eq!(&lines[0][1..9], "JL10    ");
    assert_eq!(&lines[0][9..17], "20240430");

    assert_eq!(&lines[1][36..45], "997036671");
    assert_eq!(&lines[1][97..99], "03");

    let totals = lines[2];
    assert_eq!(&totals[1..17], "0000000000100000");
    assert_eq!(&totals[17..33], "0000000000014120");
    assert_eq!(&totals[33..49], "0000000000085880");
    assert_eq!(&totals[64..79], "000000000004058");
    assert_eq!(&totals[79..94], "000000000000004");

    let employee = lines[3];
    assert_eq!(&employee[1..10], "090000045");
    assert_eq!(&employee[41..52], "01018047595");
    assert_eq!(&employee[52..54], "00");
    assert_eq!(&employee[56..67], "00000100000");
    assert_eq!(&employee[67..77], "0000014120");
    assert_eq!(&employee[77..88], "00000085880");
    assert_eq!(&employee[98..108], "0000004058");
    assert_eq!(&employee[108..118], "0000000004");
}

#[tokio::test]
async fn test_wage_tax_declaration_joins_regular_and_bonus_runs() {
    // December regular run plus the Christmas bonus over the year's
    // 200 worked days:
    // regular: 1000.00 gross, 141.20 contributions, 40.58 tax, 0.04 levy
    // bonus: 1000 * 200 / 237.5 * 1.04166 = 877.19 gross,
    //        123.86 contributions, 17.38 tax, no levy
    // joined: 1877.19 gross, 265.06 contributions, 1612.13 taxable,
    //         57.96 tax, 0.04 levy
    let router = create_router_for_test();
    let bonus_attendance: Vec<Value> = (1..=10)
        .map(|month| attendance_json("emp_001", 202400 + month, "worked_days", 20))
        .collect();
    let request = json!({
        "year": 2024,
        "month": 12,
        "issue_date": "2024-12-31",
        "company": company_json(),
        "employments": [salaried_employment("emp_001")],
        "runs": [
            {
                "period": period_json(2024, 12, 12, "regular", "2024-12-31"),
                "attendance": [attendance_json("emp_001", 202412, "worked_days", 25)]
            },
            {
                "period": period_json(2024, 1, 12, "christmas_bonus", "2024-12-21"),
                "attendance": bonus_attendance
            }
        ]
    });

    let (disposition, bytes) = post_archive(router, "/declarations/wage-tax", request).await;
    assert!(disposition.contains("fmy-202412.zip"));

    let text = unpack_entry(&bytes, "JL10");
    let lines: Vec<&str> = text.split('\n').collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(&lines[0][9..17], "20241231");
    assert_eq!(&lines[1][97..99], "12");

    let totals = lines[2];
    assert_eq!(&totals[1..17], "0000000000187719");
    assert_eq!(&totals[17..33], "0000000000026506");
    assert_eq!(&totals[33..49], "0000000000161213");
    assert_eq!(&totals[64..79], "000000000005796");
    assert_eq!(&totals[79..94], "000000000000004");

    let employee = lines[3];
    assert_eq!(&employee[56..67], "00000187719");
    assert_eq!(&employee[67..77], "0000026506");
    assert_eq!(&employee[77..88], "00000161213");
    assert_eq!(&employee[98..108], "0000005796");
    assert_eq!(&employee[108..118], "0000000004");
}

#[tokio::test]
async fn test_wage_tax_declaration_without_wages_returns_404() {
    let router = create_router_for_test();
    let request = json!({
        "year": 2024,
        "month": 3,
        "issue_date": "2024-04-30",
        "company": company_json(),
        "employments": [salaried_employment("emp_001")],
        "runs": []
    });

    let (status, error) = post_json(router, "/declarations/wage-tax", request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "EMPTY_DECLARATION");
    assert!(error["message"].as_str().unwrap().contains("202403"));
}

// =============================================================================
// SECTION 5: Error Cases - 6 tests
// =============================================================================

#[tokio::test]
async fn test_error_malformed_json() {
    let router = create_router_for_test();

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/payroll/summary")
                .header("Content-Type", "application/json")
                .body(Body::from("{invalid json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(error["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_error_missing_employments_field() {
    let router = create_router_for_test();
    let body = json!({
        "period": march_period(),
        "attendance": []
    });

    let (status, error) = post_json(router, "/payroll/summary", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["message"].as_str().unwrap().contains("missing field"));
}

#[tokio::test]
async fn test_error_unknown_employment() {
    // Attendance referencing an employment that was not supplied
    let router = create_router_for_test();
    let request = summary_request(
        vec![salaried_employment("emp_001")],
        vec![attendance_json("emp_999", 202403, "worked_days", 25)],
    );

    let (status, error) = post_json(router, "/payroll/summary", request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "EMPLOYMENT_NOT_FOUND");
    assert!(error["message"].as_str().unwrap().contains("emp_999"));
}

#[tokio::test]
async fn test_error_reversed_period_months() {
    let router = create_router_for_test();
    let request = json!({
        "period": period_json(2024, 5, 2, "regular", "2024-05-31"),
        "employments": [salaried_employment("emp_001")],
        "attendance": [attendance_json("emp_001", 202403, "worked_days", 25)]
    });

    let (status, error) = post_json(router, "/payroll/summary", request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_PERIOD");
}

#[tokio::test]
async fn test_error_period_before_rate_history() {
    // The coverage package has no rate before 2020
    let router = create_router_for_test();
    let request = json!({
        "period": period_json(2019, 12, 12, "regular", "2019-12-31"),
        "employments": [salaried_employment("emp_001")],
        "attendance": [attendance_json("emp_001", 201912, "worked_days", 25)]
    });

    let (status, error) = post_json(router, "/payroll/summary", request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "RATE_NOT_FOUND");
    assert!(error["message"].as_str().unwrap().contains("0101"));
}

#[tokio::test]
async fn test_error_invalid_insurance_number() {
    let router = create_router_for_test();
    let mut employment = salaried_employment("emp_001");
    employment["employee"]["insurance_number"] = json!("12345678901");
    let request = summary_request(
        vec![employment],
        vec![attendance_json("emp_001", 202403, "worked_days", 25)],
    );

    let (status, error) = post_json(router, "/payroll/summary", request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert!(error["message"].as_str().unwrap().contains("12345678901"));
}

// =============================================================================
// SECTION 6: Response Field Validation - 2 tests
// =============================================================================

#[tokio::test]
async fn test_summary_contains_all_required_fields() {
    let router = create_router_for_test();
    let request = summary_request(
        vec![salaried_employment("emp_001")],
        vec![attendance_json("emp_001", 202403, "worked_days", 25)],
    );

    let (status, result) = post_json(router, "/payroll/summary", request).await;

    assert_eq!(status, StatusCode::OK);

    // Verify top-level fields
    assert!(result["id"].is_string());
    assert!(result["period"].is_object());
    assert!(result["rows"].is_array());
    assert!(result["warnings"].is_array());

    // Monetary fields serialize as strings, counters as numbers
    let row = &result["rows"][0];
    assert!(row["employment_id"].is_string());
    assert!(row["tax_id"].is_string());
    assert!(row["display_name"].is_string());
    assert!(row["daily_rate"].is_string());
    assert!(row["days"].is_number());
    assert!(row["children"].is_number());
    assert!(row["gross"].is_string());
    assert!(row["employee_contributions"].is_string());
    assert!(row["employer_contributions"].is_string());
    assert!(row["total_contributions"].is_string());
    assert!(row["taxable"].is_string());
    assert!(row["tax"].is_string());
    assert!(row["levy"].is_string());
    assert!(row["net"].is_string());

    // Verify totals
    let totals = &result["totals"];
    assert!(totals["days"].is_number());
    assert!(totals["gross"].is_string());
    assert!(totals["net"].is_string());
}

#[tokio::test]
async fn test_summary_period_echoes_request() {
    let router = create_router_for_test();
    let request = summary_request(
        vec![salaried_employment("emp_001")],
        vec![attendance_json("emp_001", 202403, "worked_days", 25)],
    );

    let (status, result) = post_json(router, "/payroll/summary", request).await;

    assert_eq!(status, StatusCode::OK);
    let period = &result["period"];
    assert_eq!(period["year"].as_i64().unwrap(), 2024);
    assert_eq!(period["from_month"].as_u64().unwrap(), 3);
    assert_eq!(period["to_month"].as_u64().unwrap(), 3);
    assert_eq!(period["run_type"], "regular");
    assert_eq!(period["issue_date"], "2024-03-31");
}
