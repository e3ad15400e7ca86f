//! NI contribution rates by category.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{NiCategory, TaxYear};

/// Employee and employer rates for one NI category.
///
/// Rates are fractions, e.g. `0.138` for 13.8%. Employee contributions are
/// nil below the Primary Threshold and employer contributions nil below the
/// Secondary Threshold, so those bands carry no rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NiCategoryRatesEntry {
    /// Employee rate on earnings above PT up to and including UEL.
    pub employee_rate_pt_to_uel: Decimal,
    /// Employee rate on earnings above UEL.
    pub employee_rate_above_uel: Decimal,
    /// Employer rate on earnings above ST up to and including FUST.
    pub employer_rate_st_to_fust: Decimal,
    /// Employer rate on earnings above FUST up to and including UEL.
    pub employer_rate_fust_to_uel: Decimal,
    /// Employer rate on earnings above UEL.
    pub employer_rate_above_uel: Decimal,
}

/// The rates for every category available in a tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NiCategoryRateTable {
    tax_year: TaxYear,
    entries: HashMap<NiCategory, NiCategoryRatesEntry>,
}

impl NiCategoryRateTable {
    /// Builds a rate table, rejecting categories not valid in `tax_year` and negative rates.
    pub fn new(
        tax_year: TaxYear,
        entries: HashMap<NiCategory, NiCategoryRatesEntry>,
    ) -> EngineResult<Self> {
        for (category, rates) in &entries {
            if !category.is_valid_for(tax_year) {
                return Err(EngineError::invalid_argument(
                    "ni_category",
                    format!("category {} is not valid in tax year {}", category, tax_year),
                ));
            }
            let all_rates = [
                rates.employee_rate_pt_to_uel,
                rates.employee_rate_above_uel,
                rates.employer_rate_st_to_fust,
                rates.employer_rate_fust_to_uel,
                rates.employer_rate_above_uel,
            ];
            if all_rates.iter().any(|r| r.is_sign_negative()) {
                return Err(EngineError::invalid_argument(
                    "ni_rates",
                    format!("category {} has a negative rate", category),
                ));
            }
        }

        Ok(Self { tax_year, entries })
    }

    /// The tax year these rates apply to.
    pub fn tax_year(&self) -> TaxYear {
        self.tax_year
    }

    /// Looks up the rates for a category.
    ///
    /// Returns `NiRatesNotFound` if the table has no entry for the category.
    pub fn get(&self, category: NiCategory) -> EngineResult<&NiCategoryRatesEntry> {
        self.entries
            .get(&category)
            .ok_or(EngineError::NiRatesNotFound {
                category,
                tax_year: self.tax_year,
            })
    }

    /// The categories present in the table, in alphabetical order.
    pub fn categories(&self) -> Vec<NiCategory> {
        let mut categories: Vec<NiCategory> = self.entries.keys().copied().collect();
        categories.sort();
        categories
    }
}
