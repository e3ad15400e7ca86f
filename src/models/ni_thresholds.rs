//! Annual NI thresholds.
//!
//! A [`NiThresholdSet`] holds one annual value per threshold type. Which
//! threshold types a tax year defines is fixed by [`NiThresholdType::required_for`],
//! and a set is rejected at construction unless it matches exactly.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{Money, TaxYear};

/// A statutory NI threshold level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NiThresholdType {
    /// Lower Earnings Limit.
    Lel,
    /// Primary Threshold.
    Pt,
    /// Secondary Threshold.
    St,
    /// Freeport Upper Secondary Threshold.
    Fust,
    /// Upper Secondary Threshold (under 21).
    Ust,
    /// Apprentice Upper Secondary Threshold (under 25).
    Aust,
    /// Veterans Upper Secondary Threshold.
    Vust,
    /// Upper Earnings Limit.
    Uel,
    /// Directors' Primary Threshold.
    Dpt,
    /// Investment Zone Upper Secondary Threshold.
    Izust,
}

const THRESHOLDS_2022: &[NiThresholdType] = &[
    NiThresholdType::Lel,
    NiThresholdType::Pt,
    NiThresholdType::St,
    NiThresholdType::Fust,
    NiThresholdType::Ust,
    NiThresholdType::Aust,
    NiThresholdType::Vust,
    NiThresholdType::Uel,
    NiThresholdType::Dpt,
];

const THRESHOLDS_2023: &[NiThresholdType] = &[
    NiThresholdType::Lel,
    NiThresholdType::Pt,
    NiThresholdType::St,
    NiThresholdType::Fust,
    NiThresholdType::Ust,
    NiThresholdType::Aust,
    NiThresholdType::Vust,
    NiThresholdType::Uel,
];

const THRESHOLDS_2024: &[NiThresholdType] = &[
    NiThresholdType::Lel,
    NiThresholdType::Pt,
    NiThresholdType::St,
    NiThresholdType::Fust,
    NiThresholdType::Ust,
    NiThresholdType::Aust,
    NiThresholdType::Vust,
    NiThresholdType::Uel,
    NiThresholdType::Izust,
];

impl NiThresholdType {
    /// The threshold types a tax year defines, or `None` if the year is unsupported.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_ni_engine::models::{NiThresholdType, TaxYear};
    ///
    /// let types = NiThresholdType::required_for(TaxYear::starting(2022)).unwrap();
    /// assert!(types.contains(&NiThresholdType::Dpt));
    /// assert!(!types.contains(&NiThresholdType::Izust));
    /// ```
    pub fn required_for(tax_year: TaxYear) -> Option<&'static [NiThresholdType]> {
        match tax_year.starting_year() {
            2022 => Some(THRESHOLDS_2022),
            2023 => Some(THRESHOLDS_2023),
            2024 => Some(THRESHOLDS_2024),
            _ => None,
        }
    }

    /// The conventional abbreviation, e.g. "LEL".
    pub fn abbreviation(self) -> &'static str {
        match self {
            NiThresholdType::Lel => "LEL",
            NiThresholdType::Pt => "PT",
            NiThresholdType::St => "ST",
            NiThresholdType::Fust => "FUST",
            NiThresholdType::Ust => "UST",
            NiThresholdType::Aust => "AUST",
            NiThresholdType::Vust => "VUST",
            NiThresholdType::Uel => "UEL",
            NiThresholdType::Dpt => "DPT",
            NiThresholdType::Izust => "IZUST",
        }
    }
}

impl fmt::Display for NiThresholdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// One annual threshold value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NiThresholdEntry {
    /// Which threshold this is.
    pub threshold_type: NiThresholdType,
    /// The annual value in pounds.
    pub annual_value: Money,
}

/// The complete set of annual NI thresholds for a tax year.
///
/// # Example
///
/// ```
/// use payroll_ni_engine::models::{NiThresholdEntry, NiThresholdSet, NiThresholdType, TaxYear};
/// use rust_decimal::Decimal;
///
/// let year = TaxYear::starting(2023);
/// let entries: Vec<NiThresholdEntry> = NiThresholdType::required_for(year)
///     .unwrap()
///     .iter()
///     .map(|t| NiThresholdEntry { threshold_type: *t, annual_value: Decimal::from(1000) })
///     .collect();
///
/// let set = NiThresholdSet::new(year, entries).unwrap();
/// assert_eq!(set.get_threshold(NiThresholdType::Uel), Some(Decimal::from(1000)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NiThresholdSet {
    tax_year: TaxYear,
    entries: Vec<NiThresholdEntry>,
}

impl NiThresholdSet {
    /// Builds a threshold set, validating it against the tax year's required types.
    ///
    /// Returns `InvalidArgument` if the year is unsupported, a value is
    /// negative, a type is repeated, missing, or not defined for the year.
    pub fn new(tax_year: TaxYear, entries: Vec<NiThresholdEntry>) -> EngineResult<Self> {
        let required = NiThresholdType::required_for(tax_year).ok_or_else(|| {
            EngineError::invalid_argument(
                "tax_year",
                format!("no NI threshold types are defined for tax year {}", tax_year),
            )
        })?;

        if entries.len() != required.len() {
            return Err(EngineError::invalid_argument(
                "thresholds",
                format!(
                    "tax year {} requires {} thresholds, got {}",
                    tax_year,
                    required.len(),
                    entries.len()
                ),
            ));
        }

        for (index, entry) in entries.iter().enumerate() {
            if !required.contains(&entry.threshold_type) {
                return Err(EngineError::invalid_argument(
                    "thresholds",
                    format!(
                        "{} is not a valid threshold in tax year {}",
                        entry.threshold_type, tax_year
                    ),
                ));
            }
            if entries[..index]
                .iter()
                .any(|e| e.threshold_type == entry.threshold_type)
            {
                return Err(EngineError::invalid_argument(
                    "thresholds",
                    format!("{} appears more than once", entry.threshold_type),
                ));
            }
            if entry.annual_value.is_sign_negative() {
                return Err(EngineError::invalid_argument(
                    "thresholds",
                    format!("{} must not be negative", entry.threshold_type),
                ));
            }
        }

        Ok(Self { tax_year, entries })
    }

    /// The tax year these thresholds belong to.
    pub fn tax_year(&self) -> TaxYear {
        self.tax_year
    }

    /// The annual value of a threshold, or `None` if the year does not define it.
    pub fn get_threshold(&self, threshold_type: NiThresholdType) -> Option<Money> {
        self.entries
            .iter()
            .find(|e| e.threshold_type == threshold_type)
            .map(|e| e.annual_value)
    }

    /// Iterates the entries in the order they were supplied.
    pub fn iter(&self) -> impl Iterator<Item = &NiThresholdEntry> {
        self.entries.iter()
    }
}
