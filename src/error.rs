//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while aggregating payroll data
//! and encoding statutory declarations.

use thiserror::Error;

use crate::models::Period;

/// The main error type for the payroll engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use misthos_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/file.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/file.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The loaded configuration is internally inconsistent.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// A description of the inconsistency.
        message: String,
    },

    /// A pay period specification violated its invariants.
    #[error("Invalid pay period: {message}")]
    InvalidPeriod {
        /// A description of what made the period invalid.
        message: String,
    },

    /// No contribution rate is in effect for a coverage package and period.
    ///
    /// Unlike a missing earnings formula (which only skips the affected
    /// attendance group), a missing rate aborts the whole run.
    #[error("Contribution rate not found for package '{package}' in period {period}")]
    RateNotFound {
        /// The coverage package code.
        package: String,
        /// The period for which the rate was requested.
        period: Period,
    },

    /// An attendance entry referenced an employment that was not supplied.
    #[error("Employment not found: {id}")]
    EmploymentNotFound {
        /// The missing employment id.
        id: String,
    },

    /// An earnings formula could not be parsed or evaluated.
    #[error("Formula '{expression}' failed: {message}")]
    FormulaError {
        /// The offending formula source text.
        expression: String,
        /// A description of the failure.
        message: String,
    },

    /// The same (employment, pay type) pair appeared in two joined periods.
    #[error("Duplicate pay type '{pay_type}' for employment '{employment}' while joining periods")]
    DuplicateEntry {
        /// The employment id involved in the collision.
        employment: String,
        /// The statutory pay type code involved in the collision.
        pay_type: String,
    },

    /// A value does not fit its fixed-width report column.
    #[error("Value '{value}' does not fit in {width}-character field '{field}'")]
    EncodingError {
        /// The report field being encoded.
        field: String,
        /// The textual value that overflowed.
        value: String,
        /// The column width in characters.
        width: usize,
    },

    /// The declaration archive could not be assembled.
    #[error("Failed to build report archive: {message}")]
    ArchiveError {
        /// A description of the archive failure.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
