//! HTTP API module for the payroll engine.
//!
//! This module provides the REST endpoints: one for per-run payroll
//! summaries and two for downloading the statutory declarations as zip
//! archives.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    PayPeriodRequest, PayRunRequest, SocialDeclarationRequest, SummaryRequest,
    WageTaxDeclarationRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
