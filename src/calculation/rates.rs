//! Effective-dated rate lookup.
//!
//! Builds the contribution rate table from the coverage package
//! configuration and resolves the rate row in force for a period:
//! the latest row whose effective period is at or before the requested
//! one. A package or period with no row in force is a fatal error, since
//! contributions cannot be split without it.

use std::collections::HashMap;

use tracing::warn;

use crate::config::{ContributionRate, CoveragePackage};
use crate::error::{EngineError, EngineResult};
use crate::models::{latest_at_or_before, Period};

use super::tax::{brackets_for_year, TaxBracket};

/// Rate lookup table built from the coverage package configuration.
#[derive(Debug, Clone)]
pub struct RateTable {
    packages: HashMap<String, CoveragePackage>,
}

impl RateTable {
    /// Builds a rate table, sorting each package's rate history.
    ///
    /// Rate rows whose employee and employer percentages do not add up to
    /// the declared total are kept but logged, since the total is what
    /// the declaration carries.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] for a package with
    /// no rate rows at all.
    pub fn new(mut packages: HashMap<String, CoveragePackage>) -> EngineResult<Self> {
        for (code, package) in &mut packages {
            if package.rates.is_empty() {
                return Err(EngineError::InvalidConfiguration {
                    message: format!("coverage package '{code}' has no contribution rates"),
                });
            }
            package.rates.sort_by_key(|rate| rate.effective_from);
            for rate in &package.rates {
                if !rate.is_consistent() {
                    warn!(
                        package = %code,
                        effective_from = %rate.effective_from,
                        "employee and employer percentages do not sum to the total"
                    );
                }
            }
        }
        Ok(RateTable { packages })
    }

    /// Returns a coverage package by code.
    pub fn package(&self, code: &str) -> Option<&CoveragePackage> {
        self.packages.get(code)
    }

    /// Resolves the contribution rate in force for a package and period.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RateNotFound`] when the package is unknown
    /// or has no row effective at or before the period.
    pub fn contribution_rate(
        &self,
        package: &str,
        period: Period,
    ) -> EngineResult<&ContributionRate> {
        let rates = self
            .packages
            .get(package)
            .map(|p| p.rates.as_slice())
            .unwrap_or(&[]);
        latest_at_or_before(rates, period, |rate| rate.effective_from).ok_or_else(|| {
            EngineError::RateNotFound {
                package: package.to_string(),
                period,
            }
        })
    }

    /// Returns the tax bracket schedule for a year.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] for unsupported years.
    pub fn tax_brackets(&self, year: i32) -> EngineResult<Vec<TaxBracket>> {
        brackets_for_year(year)
    }
}
