//! Payroll computation engine for Greek statutory declarations
//!
//! This crate aggregates attendance into payroll runs, computes social-security
//! contributions and wage-tax withholding, and encodes the results into the
//! fixed-width submission formats of the social-security declaration (ΑΠΔ)
//! and the wage-tax declaration (ΦΜΥ).

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
