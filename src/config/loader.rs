//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! configurations from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::{Period, WageBasis};

use super::types::{
    CompiledFormula, ContributionRate, FormulasConfig, PackagesConfig, PayRunType, PayRunsConfig,
    PayTypesConfig, PayrollConfig, StatutoryPayType,
};
use crate::calculation::RateTable;

/// Loads and provides access to payroll configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and provides methods to query contribution rates, pay types, run
/// types and earnings formulas. All earnings formulas are compiled while
/// loading, so a malformed expression fails here and not during a run.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/efka/
/// ├── packages.yaml   # Coverage packages and contribution rates
/// ├── pay_types.yaml  # Statutory pay types
/// ├── pay_runs.yaml   # Pay run types
/// └── formulas.yaml   # Earnings formulas
/// ```
///
/// # Example
///
/// ```no_run
/// use misthos_engine::config::ConfigLoader;
/// use misthos_engine::models::Period;
///
/// let loader = ConfigLoader::load("./config/efka").unwrap();
///
/// // Resolve the contribution rate in effect for a period
/// let period = Period::from_parts(2024, 3).unwrap();
/// let rate = loader.contribution_rate("0101", period).unwrap();
/// println!("Employee share: {}%", rate.employee_pct);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/efka")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - A formula does not compile or references unknown codes
    ///
    /// # Example
    ///
    /// ```no_run
    /// use misthos_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/efka")?;
    /// # Ok::<(), misthos_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let packages = Self::load_yaml::<PackagesConfig>(&path.join("packages.yaml"))?;
        let pay_types = Self::load_yaml::<PayTypesConfig>(&path.join("pay_types.yaml"))?;
        let runs = Self::load_yaml::<PayRunsConfig>(&path.join("pay_runs.yaml"))?;
        let formulas = Self::load_yaml::<FormulasConfig>(&path.join("formulas.yaml"))?;

        let config = PayrollConfig::new(packages, pay_types, runs, formulas)?;

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying payroll configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Returns the contribution rate table.
    pub fn rates(&self) -> &RateTable {
        self.config.rates()
    }

    /// Resolves the contribution rate in force for a package and period.
    ///
    /// # Arguments
    ///
    /// * `package` - The 4-digit coverage package code
    /// * `period` - The period the rate must be effective for
    ///
    /// # Returns
    ///
    /// Returns the rate row, or `RateNotFound` when the package is
    /// unknown or has no row effective at or before the period.
    pub fn contribution_rate(
        &self,
        package: &str,
        period: Period,
    ) -> EngineResult<&ContributionRate> {
        self.config.rates().contribution_rate(package, period)
    }

    /// Looks up a statutory pay type by its 2-digit code.
    pub fn pay_type(&self, code: &str) -> EngineResult<&StatutoryPayType> {
        self.config.pay_type(code)
    }

    /// Looks up a pay run type by its code.
    pub fn run_type(&self, code: &str) -> EngineResult<&PayRunType> {
        self.config.run_type(code)
    }

    /// Looks up the earnings formula for a presence type, wage basis and
    /// run type. Returns `None` when no formula is configured.
    pub fn formula(
        &self,
        presence_type: &str,
        wage_basis: WageBasis,
        run_type: &str,
    ) -> Option<&CompiledFormula> {
        self.config.formula(presence_type, wage_basis, run_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/efka"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.pay_type("01").unwrap().name, "Regular earnings");
        assert!(loader.pay_type("01").unwrap().payable);
        assert!(!loader.pay_type("18").unwrap().payable);
    }

    #[test]
    fn test_contribution_rate_switches_at_effective_period() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let before = Period::from_parts(2020, 5).unwrap();
        let rate = loader.contribution_rate("0101", before).unwrap();
        assert_eq!(rate.employee_pct, dec("15.75"));
        assert_eq!(rate.total_pct, dec("40.56"));

        let after = Period::from_parts(2021, 12).unwrap();
        let rate = loader.contribution_rate("0101", after).unwrap();
        assert_eq!(rate.employee_pct, dec("14.12"));
        assert_eq!(rate.total_pct, dec("36.66"));
    }

    #[test]
    fn test_contribution_rate_unknown_package_returns_error() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let period = Period::from_parts(2024, 1).unwrap();
        let result = loader.contribution_rate("9999", period);

        match result {
            Err(EngineError::RateNotFound { package, .. }) => {
                assert_eq!(package, "9999");
            }
            _ => panic!("Expected RateNotFound error"),
        }
    }

    #[test]
    fn test_run_type_factors() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let regular = loader.run_type("regular").unwrap();
        assert_eq!(regular.annualization_factor, dec("14"));
        assert!(regular.regular);

        let bonus = loader.run_type("christmas_bonus").unwrap();
        assert!(!bonus.regular);
    }

    #[test]
    fn test_formulas_are_compiled_at_load() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let formula = loader
            .formula("worked_days", WageBasis::Salaried, "regular")
            .unwrap();
        assert_eq!(formula.pay_type, "01");
        assert!(formula.counts_days);
        assert_eq!(formula.formula.source(), "salary * quantity / 25");
    }

    #[test]
    fn test_unconfigured_formula_is_none() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        assert!(loader
            .formula("sabbatical_days", WageBasis::Salaried, "regular")
            .is_none());
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");
        assert!(result.is_err());

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("packages.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }
}
