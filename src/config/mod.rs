//! Reference data for the payroll NI engine.
//!
//! The calculators read thresholds and rates through the
//! [`ReferenceDataProvider`] trait. [`ConfigLoader`] implements it from YAML
//! files, one per tax year.
//!
//! # Example
//!
//! ```no_run
//! use payroll_ni_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/uk").unwrap();
//! println!("Loaded tax years: {:?}", config.tax_years());
//! ```

mod loader;
mod provider;
mod types;

pub use loader::ConfigLoader;
pub use provider::ReferenceDataProvider;
pub use types::{
    Effective, NiTaxYearConfig, NiTaxYearData, RateTableConfig, ThresholdSetConfig,
};
