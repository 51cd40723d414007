//! Configuration types for payroll calculation.
//!
//! This module contains the strongly-typed structures deserialized from
//! the YAML configuration files and the validated [`PayrollConfig`]
//! assembled from them. Formulas are compiled and cross-referenced
//! against the pay type and run type tables when the configuration is
//! assembled, so a bad configuration fails at load rather than mid-run.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use crate::calculation::{Formula, RateTable};
use crate::error::{EngineError, EngineResult};
use crate::models::{Period, WageBasis};

/// One effective-dated contribution rate row for a coverage package.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ContributionRate {
    /// The first period this row applies to.
    pub effective_from: Period,
    /// Percentage withheld from the employee.
    pub employee_pct: Decimal,
    /// Percentage charged to the employer.
    pub employer_pct: Decimal,
    /// Total percentage declared for the package.
    pub total_pct: Decimal,
}

impl ContributionRate {
    /// Whether the employee and employer percentages add up to the total.
    pub fn is_consistent(&self) -> bool {
        self.employee_pct + self.employer_pct == self.total_pct
    }
}

/// A social security coverage package with its rate history.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CoveragePackage {
    /// The human-readable name of the package.
    pub name: String,
    /// Rate rows in any order; sorted by effective period at load.
    pub rates: Vec<ContributionRate>,
}

/// Coverage packages configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct PackagesConfig {
    /// Map of 4-digit package code to package details.
    pub packages: HashMap<String, CoveragePackage>,
}

/// A statutory pay type as reported on declarations.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StatutoryPayType {
    /// The human-readable name of the pay type.
    pub name: String,
    /// Whether the amount is actually paid out to the employee.
    ///
    /// Non-payable types are declared for social security coverage but
    /// excluded from taxable pay and from the net amount.
    pub payable: bool,
}

/// Pay types configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct PayTypesConfig {
    /// Map of 2-digit statutory code to pay type details.
    pub pay_types: HashMap<String, StatutoryPayType>,
}

/// A pay run type such as the regular monthly run or a bonus run.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PayRunType {
    /// The human-readable name of the run type.
    pub name: String,
    /// Factor used to annualize one period of this run for tax withholding.
    pub annualization_factor: Decimal,
    /// Regular runs must cover exactly one month and are the only runs
    /// whose attendance date ranges are tracked.
    pub regular: bool,
}

/// Pay run types configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct PayRunsConfig {
    /// Map of run type code to run type details.
    pub run_types: HashMap<String, PayRunType>,
}

/// One earnings formula as written in configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FormulaSpec {
    /// The attendance presence type the formula prices.
    pub presence_type: String,
    /// The wage basis the formula applies to.
    pub wage_basis: WageBasis,
    /// The run type the formula applies to.
    pub run_type: String,
    /// The statutory pay type the priced amount accumulates into.
    pub pay_type: String,
    /// Whether the group's quantity counts as insured days.
    #[serde(default)]
    pub counts_days: bool,
    /// Whether the group's quantity also counts as holiday days.
    #[serde(default)]
    pub counts_holiday_days: bool,
    /// The formula source text.
    pub expression: String,
}

/// Earnings formulas configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct FormulasConfig {
    /// All earnings formulas.
    pub formulas: Vec<FormulaSpec>,
}

/// A formula compiled and cross-checked at configuration load.
#[derive(Debug, Clone)]
pub struct CompiledFormula {
    /// The statutory pay type the priced amount accumulates into.
    pub pay_type: String,
    /// Whether the group's quantity counts as insured days.
    pub counts_days: bool,
    /// Whether the group's quantity also counts as holiday days.
    pub counts_holiday_days: bool,
    /// The compiled expression.
    pub formula: Formula,
}

/// Lookup key for a compiled formula: presence type, wage basis, run type.
pub type FormulaKey = (String, WageBasis, String);

/// The complete payroll configuration loaded from YAML files.
///
/// This struct aggregates all configuration loaded from the various
/// YAML files in a configuration directory.
#[derive(Debug, Clone)]
pub struct PayrollConfig {
    /// Contribution rate table built from the coverage packages.
    rates: RateTable,
    /// Statutory pay types by code.
    pay_types: HashMap<String, StatutoryPayType>,
    /// Pay run types by code.
    run_types: HashMap<String, PayRunType>,
    /// Compiled formulas by lookup key.
    formulas: HashMap<FormulaKey, CompiledFormula>,
}

impl PayrollConfig {
    /// Assembles and validates a PayrollConfig from its component parts.
    ///
    /// # Errors
    ///
    /// Fails with [`EngineError::FormulaError`] when an expression does
    /// not compile, and with [`EngineError::InvalidConfiguration`] when a
    /// formula references an unknown pay type or run type, when two
    /// formulas share a lookup key, or when a package has no rate rows.
    pub fn new(
        packages: PackagesConfig,
        pay_types: PayTypesConfig,
        runs: PayRunsConfig,
        formulas: FormulasConfig,
    ) -> EngineResult<Self> {
        let rates = RateTable::new(packages.packages)?;
        let mut compiled = HashMap::new();
        for spec in formulas.formulas {
            if !pay_types.pay_types.contains_key(&spec.pay_type) {
                return Err(EngineError::InvalidConfiguration {
                    message: format!(
                        "formula for presence type '{}' references unknown pay type '{}'",
                        spec.presence_type, spec.pay_type
                    ),
                });
            }
            if !runs.run_types.contains_key(&spec.run_type) {
                return Err(EngineError::InvalidConfiguration {
                    message: format!(
                        "formula for presence type '{}' references unknown run type '{}'",
                        spec.presence_type, spec.run_type
                    ),
                });
            }
            let formula = Formula::compile(&spec.expression)?;
            let key = (spec.presence_type, spec.wage_basis, spec.run_type);
            let entry = CompiledFormula {
                pay_type: spec.pay_type,
                counts_days: spec.counts_days,
                counts_holiday_days: spec.counts_holiday_days,
                formula,
            };
            if compiled.insert(key.clone(), entry).is_some() {
                return Err(EngineError::InvalidConfiguration {
                    message: format!(
                        "duplicate formula for presence type '{}', wage basis {:?}, run type '{}'",
                        key.0, key.1, key.2
                    ),
                });
            }
        }
        Ok(PayrollConfig {
            rates,
            pay_types: pay_types.pay_types,
            run_types: runs.run_types,
            formulas: compiled,
        })
    }

    /// Returns the contribution rate table.
    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Looks up a statutory pay type by code.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] for unknown codes.
    pub fn pay_type(&self, code: &str) -> EngineResult<&StatutoryPayType> {
        self.pay_types
            .get(code)
            .ok_or_else(|| EngineError::InvalidConfiguration {
                message: format!("unknown pay type '{code}'"),
            })
    }

    /// Looks up a pay run type by code.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] for unknown codes.
    pub fn run_type(&self, code: &str) -> EngineResult<&PayRunType> {
        self.run_types
            .get(code)
            .ok_or_else(|| EngineError::InvalidConfiguration {
                message: format!("unknown run type '{code}'"),
            })
    }

    /// Looks up the earnings formula for a presence type, wage basis and
    /// run type.
    ///
    /// Absence is not an error: the caller records a warning and skips
    /// the attendance group.
    pub fn formula(
        &self,
        presence_type: &str,
        wage_basis: WageBasis,
        run_type: &str,
    ) -> Option<&CompiledFormula> {
        self.formulas
            .get(&(presence_type.to_string(), wage_basis, run_type.to_string()))
    }
}
