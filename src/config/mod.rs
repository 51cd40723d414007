//! Configuration loading and management for the payroll engine.
//!
//! This module provides functionality to load payroll configurations from
//! YAML files, including coverage packages with their contribution rates,
//! statutory pay types, pay run types and earnings formulas.
//!
//! # Example
//!
//! ```no_run
//! use misthos_engine::config::ConfigLoader;
//! use misthos_engine::models::Period;
//!
//! let config = ConfigLoader::load("./config/efka").unwrap();
//! let period = Period::from_parts(2024, 3).unwrap();
//! let rate = config.contribution_rate("0101", period).unwrap();
//! println!("Total contribution: {}%", rate.total_pct);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    CompiledFormula, ContributionRate, CoveragePackage, FormulaKey, FormulaSpec, FormulasConfig,
    PackagesConfig, PayRunType, PayRunsConfig, PayTypesConfig, PayrollConfig, StatutoryPayType,
};
