//! Configuration types for NI reference data.
//!
//! The `*Config` structures mirror the YAML files one-to-one. They are
//! validated and converted into [`NiTaxYearData`] by the loader.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

use crate::models::{
    NiCategory, NiCategoryRateTable, NiCategoryRatesEntry, NiThresholdSet, NiThresholdType,
    TaxYear,
};

/// One tax year's NI reference data file, e.g. `ni/2024-25.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct NiTaxYearConfig {
    /// The calendar year the tax year starts in.
    pub tax_year: TaxYear,
    /// Annual threshold sets, one per in-year change.
    pub thresholds: Vec<ThresholdSetConfig>,
    /// Employee rate tables, one per in-year change.
    pub rates: Vec<RateTableConfig>,
    /// Directors' annual rates by category.
    pub directors_rates: HashMap<NiCategory, NiCategoryRatesEntry>,
    /// Class 1A rate as a fraction.
    pub class_1a_rate: Decimal,
}

/// Annual threshold values effective from a date.
#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdSetConfig {
    /// First date these values apply.
    pub effective_from: NaiveDate,
    /// Annual value by threshold type.
    pub values: BTreeMap<NiThresholdType, Decimal>,
}

/// Employee rates effective from a date.
#[derive(Debug, Clone, Deserialize)]
pub struct RateTableConfig {
    /// First date these rates apply.
    pub effective_from: NaiveDate,
    /// Rates by category.
    pub categories: HashMap<NiCategory, NiCategoryRatesEntry>,
}

/// A value that applies from a date until the next one takes over.
#[derive(Debug, Clone)]
pub struct Effective<T> {
    /// First date the value applies.
    pub effective_from: NaiveDate,
    /// The value.
    pub value: T,
}

/// Validated reference data for one tax year.
#[derive(Debug, Clone)]
pub struct NiTaxYearData {
    tax_year: TaxYear,
    thresholds: Vec<Effective<NiThresholdSet>>,
    rates: Vec<Effective<NiCategoryRateTable>>,
    directors_rates: NiCategoryRateTable,
    class1a_rate: Decimal,
}

impl NiTaxYearData {
    /// Creates the data for a tax year, sorting the dated entries oldest first.
    pub fn new(
        tax_year: TaxYear,
        mut thresholds: Vec<Effective<NiThresholdSet>>,
        mut rates: Vec<Effective<NiCategoryRateTable>>,
        directors_rates: NiCategoryRateTable,
        class1a_rate: Decimal,
    ) -> Self {
        thresholds.sort_by_key(|e| e.effective_from);
        rates.sort_by_key(|e| e.effective_from);
        Self {
            tax_year,
            thresholds,
            rates,
            directors_rates,
            class1a_rate,
        }
    }

    /// The tax year.
    pub fn tax_year(&self) -> TaxYear {
        self.tax_year
    }

    /// Threshold sets, oldest first.
    pub fn thresholds(&self) -> &[Effective<NiThresholdSet>] {
        &self.thresholds
    }

    /// Employee rate tables, oldest first.
    pub fn rates(&self) -> &[Effective<NiCategoryRateTable>] {
        &self.rates
    }

    /// Directors' annual rates.
    pub fn directors_rates(&self) -> &NiCategoryRateTable {
        &self.directors_rates
    }

    /// Class 1A rate.
    pub fn class1a_rate(&self) -> Decimal {
        self.class1a_rate
    }
}
