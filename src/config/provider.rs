//! The reference data the NI calculator is built from.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{NiCategoryRateTable, NiThresholdSet, TaxYear};

/// Supplies NI thresholds and rates.
///
/// Thresholds and regular rates are resolved by date because both can change
/// part way through a tax year. Directors' rates and the Class 1A rate are
/// annual.
pub trait ReferenceDataProvider: Send + Sync {
    /// The annual thresholds in force on `date`.
    fn ni_thresholds(&self, date: NaiveDate) -> EngineResult<&NiThresholdSet>;

    /// The employee rate table in force on `date`.
    fn ni_rates(&self, date: NaiveDate) -> EngineResult<&NiCategoryRateTable>;

    /// The directors' annual rate table for `tax_year`.
    fn ni_directors_rates(&self, tax_year: TaxYear) -> EngineResult<&NiCategoryRateTable>;

    /// The Class 1A rate for `tax_year`, as a fraction.
    fn class1a_rate(&self, tax_year: TaxYear) -> EngineResult<Decimal>;
}
