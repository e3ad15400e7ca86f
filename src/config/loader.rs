//! Reference data loading.
//!
//! This module provides the [`ConfigLoader`] type for loading NI thresholds
//! and rates from YAML files.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{NiCategoryRateTable, NiThresholdEntry, NiThresholdSet, TaxYear};

use super::ReferenceDataProvider;
use super::types::{Effective, NiTaxYearConfig, NiTaxYearData};

/// Loads and provides access to NI reference data.
///
/// # Directory Structure
///
/// ```text
/// config/uk/
/// └── ni/
///     ├── 2022-23.yaml
///     ├── 2023-24.yaml
///     └── 2024-25.yaml
/// ```
///
/// Each file holds one tax year: dated threshold sets, dated employee rate
/// tables, the directors' rate table and the Class 1A rate.
///
/// # Example
///
/// ```no_run
/// use payroll_ni_engine::config::{ConfigLoader, ReferenceDataProvider};
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/uk").unwrap();
///
/// let date = NaiveDate::from_ymd_opt(2022, 11, 30).unwrap();
/// let rates = loader.ni_rates(date).unwrap();
/// println!("Categories: {:?}", rates.categories());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    years: BTreeMap<TaxYear, NiTaxYearData>,
}

impl ConfigLoader {
    /// Loads every tax year file under `<path>/ni`.
    ///
    /// Returns an error if:
    /// - The directory is missing or holds no YAML files
    /// - Any file contains invalid YAML
    /// - A threshold set or category is not valid for the file's tax year
    /// - A tax year appears in more than one file
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let ni_dir = path.as_ref().join("ni");
        let ni_dir_str = ni_dir.display().to_string();

        let entries = fs::read_dir(&ni_dir).map_err(|_| EngineError::ConfigNotFound {
            path: ni_dir_str.clone(),
        })?;

        let mut years = BTreeMap::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: ni_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let config = Self::load_yaml::<NiTaxYearConfig>(&path)?;
                let data = Self::validate(config, &path)?;
                let tax_year = data.tax_year();

                if years.insert(tax_year, data).is_some() {
                    return Err(EngineError::ConfigParseError {
                        path: path.display().to_string(),
                        message: format!("tax year {} is defined more than once", tax_year),
                    });
                }
            }
        }

        if years.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no NI reference data files found)", ni_dir_str),
            });
        }

        info!(
            path = %ni_dir_str,
            tax_years = ?years.keys().map(ToString::to_string).collect::<Vec<_>>(),
            "Loaded NI reference data"
        );

        Ok(Self { years })
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

    /// Converts a parsed file into validated tax year data.
    fn validate(config: NiTaxYearConfig, path: &Path) -> EngineResult<NiTaxYearData> {
        let tax_year = config.tax_year;
        let parse_error = |message: String| EngineError::ConfigParseError {
            path: path.display().to_string(),
            message,
        };

        if config.thresholds.is_empty() || config.rates.is_empty() {
            return Err(parse_error(format!(
                "tax year {} needs at least one threshold set and one rate table",
                tax_year
            )));
        }

        let dates = config
            .thresholds
            .iter()
            .map(|t| t.effective_from)
            .chain(config.rates.iter().map(|r| r.effective_from));
        for date in dates {
            if TaxYear::from_date(date) != tax_year {
                return Err(parse_error(format!(
                    "effective date {} is outside tax year {}",
                    date, tax_year
                )));
            }
        }

        let thresholds = config
            .thresholds
            .into_iter()
            .map(|set| {
                let entries = set
                    .values
                    .into_iter()
                    .map(|(threshold_type, annual_value)| NiThresholdEntry {
                        threshold_type,
                        annual_value,
                    })
                    .collect();
                Ok(Effective {
                    effective_from: set.effective_from,
                    value: NiThresholdSet::new(tax_year, entries)?,
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        let rates = config
            .rates
            .into_iter()
            .map(|table| {
                Ok(Effective {
                    effective_from: table.effective_from,
                    value: NiCategoryRateTable::new(tax_year, table.categories)?,
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        let directors_rates = NiCategoryRateTable::new(tax_year, config.directors_rates)?;

        Ok(NiTaxYearData::new(
            tax_year,
            thresholds,
            rates,
            directors_rates,
            config.class_1a_rate,
        ))
    }

    /// The tax years loaded, oldest first.
    pub fn tax_years(&self) -> Vec<TaxYear> {
        self.years.keys().copied().collect()
    }

    fn year(
        &self,
        tax_year: TaxYear,
        description: &str,
        date: NaiveDate,
    ) -> EngineResult<&NiTaxYearData> {
        self.years
            .get(&tax_year)
            .ok_or_else(|| EngineError::ReferenceDataNotFound {
                description: description.to_string(),
                date,
            })
    }

    /// The entry in force on `date`: the latest whose effective date is on or before it.
    fn in_force<'a, T>(
        entries: &'a [Effective<T>],
        description: &str,
        date: NaiveDate,
    ) -> EngineResult<&'a T> {
        entries
            .iter()
            .rev()
            .find(|e| e.effective_from <= date)
            .map(|e| &e.value)
            .ok_or_else(|| EngineError::ReferenceDataNotFound {
                description: description.to_string(),
                date,
            })
    }
}

impl ReferenceDataProvider for ConfigLoader {
    fn ni_thresholds(&self, date: NaiveDate) -> EngineResult<&NiThresholdSet> {
        let year = self.year(TaxYear::from_date(date), "NI thresholds", date)?;
        Self::in_force(year.thresholds(), "NI thresholds", date)
    }

    fn ni_rates(&self, date: NaiveDate) -> EngineResult<&NiCategoryRateTable> {
        let year = self.year(TaxYear::from_date(date), "NI rates", date)?;
        Self::in_force(year.rates(), "NI rates", date)
    }

    fn ni_directors_rates(&self, tax_year: TaxYear) -> EngineResult<&NiCategoryRateTable> {
        self.years
            .get(&tax_year)
            .map(NiTaxYearData::directors_rates)
            .ok_or(EngineError::DomainInconsistency {
                message: format!("no directors' NI rates loaded for tax year {}", tax_year),
            })
    }

    fn class1a_rate(&self, tax_year: TaxYear) -> EngineResult<Decimal> {
        self.years
            .get(&tax_year)
            .map(NiTaxYearData::class1a_rate)
            .ok_or(EngineError::DomainInconsistency {
                message: format!("no Class 1A rate loaded for tax year {}", tax_year),
            })
    }
}
