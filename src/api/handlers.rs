//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the handler functions for the payroll summary
//! and declaration download endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{aggregate, join, summarize};
use crate::config::PayrollConfig;
use crate::error::EngineError;
use crate::models::{
    is_valid_insurance_number, is_valid_tax_id, Employment, JoinedDeclaration, PayPeriod,
};
use crate::report::{
    compress_report, encode_social_declaration, encode_wage_tax_declaration, social_archive_name,
    wage_tax_archive_name, SOCIAL_ENTRY_NAME, WAGE_TAX_ENTRY_NAME,
};

use super::request::{
    PayRunRequest, SocialDeclarationRequest, SummaryRequest, WageTaxDeclarationRequest,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll/summary", post(summary_handler))
        .route("/declarations/social", post(social_declaration_handler))
        .route("/declarations/wage-tax", post(wage_tax_declaration_handler))
        .with_state(state)
}

/// Handler for the POST /payroll/summary endpoint.
///
/// Aggregates one payroll run and returns the per-employee tax summary.
async fn summary_handler(
    State(state): State<AppState>,
    payload: Result<Json<SummaryRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll summary request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    if let Err(error) = validate_identifiers(None, &request.employments) {
        return validation_response(correlation_id, error);
    }

    let period: PayPeriod = match request.period.try_into() {
        Ok(period) => period,
        Err(err) => return engine_error_response(correlation_id, err),
    };

    let config = state.config().config();
    let summary = match aggregate(&period, &request.attendance, &request.employments, config)
        .and_then(|aggregation| summarize(&aggregation, config))
    {
        Ok(summary) => summary,
        Err(err) => return engine_error_response(correlation_id, err),
    };

    info!(
        correlation_id = %correlation_id,
        summary_id = %summary.id,
        rows = summary.rows.len(),
        gross = %summary.totals.gross,
        net = %summary.totals.net,
        "Payroll summary completed"
    );
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(summary),
    )
        .into_response()
}

/// Handler for the POST /declarations/social endpoint.
///
/// Joins the submitted runs and returns the social-security declaration
/// as a zip archive.
async fn social_declaration_handler(
    State(state): State<AppState>,
    payload: Result<Json<SocialDeclarationRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing social-security declaration request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    if let Err(error) = validate_identifiers(Some(&request.company.tax_id), &request.employments) {
        return validation_response(correlation_id, error);
    }

    let declaration = match request.declaration() {
        Ok(declaration) => declaration,
        Err(err) => return engine_error_response(correlation_id, err),
    };

    let config = state.config().config();
    let joined = match join_runs(&request.runs, &request.employments, config) {
        Ok(joined) => joined,
        Err(err) => return engine_error_response(correlation_id, err),
    };

    let archive = match encode_social_declaration(&declaration, &request.company, &joined)
        .and_then(|text| compress_report(&text, SOCIAL_ENTRY_NAME))
    {
        Ok(bytes) => bytes,
        Err(err) => return engine_error_response(correlation_id, err),
    };

    let filename = social_archive_name(declaration.period, declaration.kind);
    info!(
        correlation_id = %correlation_id,
        filename = %filename,
        employments = joined.entries.len(),
        bytes = archive.len(),
        "Social-security declaration encoded"
    );
    archive_response(&filename, archive)
}

/// Handler for the POST /declarations/wage-tax endpoint.
///
/// Joins the submitted runs and returns the wage-tax declaration as a
/// zip archive, or 404 when the period carries no payable wages.
async fn wage_tax_declaration_handler(
    State(state): State<AppState>,
    payload: Result<Json<WageTaxDeclarationRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing wage-tax declaration request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    if let Err(error) = validate_identifiers(Some(&request.company.tax_id), &request.employments) {
        return validation_response(correlation_id, error);
    }

    let period = match request.period() {
        Ok(period) => period,
        Err(err) => return engine_error_response(correlation_id, err),
    };

    let config = state.config().config();
    let joined = match join_runs(&request.runs, &request.employments, config) {
        Ok(joined) => joined,
        Err(err) => return engine_error_response(correlation_id, err),
    };

    match encode_wage_tax_declaration(period, request.issue_date, &request.company, &joined) {
        Ok(Some(text)) => {
            let archive = match compress_report(&text, WAGE_TAX_ENTRY_NAME) {
                Ok(bytes) => bytes,
                Err(err) => return engine_error_response(correlation_id, err),
            };
            let filename = wage_tax_archive_name(period);
            info!(
                correlation_id = %correlation_id,
                filename = %filename,
                bytes = archive.len(),
                "Wage-tax declaration encoded"
            );
            archive_response(&filename, archive)
        }
        Ok(None) => {
            info!(
                correlation_id = %correlation_id,
                period = %period,
                "No payable wages; nothing to declare"
            );
            (
                StatusCode::NOT_FOUND,
                [(header::CONTENT_TYPE, "application/json")],
                Json(ApiError::empty_declaration(period.to_string())),
            )
                .into_response()
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Aggregates every submitted run and joins the results.
fn join_runs(
    runs: &[PayRunRequest],
    employments: &[Employment],
    config: &PayrollConfig,
) -> Result<JoinedDeclaration, EngineError> {
    let mut aggregations = Vec::with_capacity(runs.len());
    for run in runs {
        let period: PayPeriod = run.period.clone().try_into()?;
        aggregations.push(aggregate(&period, &run.attendance, employments, config)?);
    }
    join(&aggregations, config)
}

/// Checks the statutory identifiers of the company and every employee.
fn validate_identifiers(
    company_tax_id: Option<&str>,
    employments: &[Employment],
) -> Result<(), ApiError> {
    if let Some(tax_id) = company_tax_id {
        if !is_valid_tax_id(tax_id) {
            return Err(ApiError::validation_error(format!(
                "company tax id '{tax_id}' is not a valid tax identifier"
            )));
        }
    }
    for employment in employments {
        let employee = &employment.employee;
        if !is_valid_tax_id(&employee.tax_id) {
            return Err(ApiError::validation_error(format!(
                "employment '{}': tax id '{}' is not a valid tax identifier",
                employment.id, employee.tax_id
            )));
        }
        if !is_valid_insurance_number(&employee.insurance_number) {
            return Err(ApiError::validation_error(format!(
                "employment '{}': insurance number '{}' is not a valid insurance number",
                employment.id, employee.insurance_number
            )));
        }
    }
    Ok(())
}

/// Builds the 400 response for a failed identifier validation.
fn validation_response(correlation_id: Uuid, error: ApiError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        message = %error.message,
        "Identifier validation failed"
    );
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error),
    )
        .into_response()
}

/// Builds the error response for a failed JSON extraction.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {err}"))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error),
    )
        .into_response()
}

/// Builds the response for an engine error, logging it first.
fn engine_error_response(correlation_id: Uuid, error: EngineError) -> Response {
    warn!(correlation_id = %correlation_id, error = %error, "Request failed");
    let api_error: ApiErrorResponse = error.into();
    (
        api_error.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(api_error.error),
    )
        .into_response()
}

/// Builds the zip download response for an encoded declaration.
fn archive_response(filename: &str, archive: Vec<u8>) -> Response {
    let disposition = format!("attachment; filename=\"{filename}\"");
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/zip"),
            (header::CONTENT_DISPOSITION, disposition.as_str()),
        ],
        archive,
    )
        .into_response()
}
