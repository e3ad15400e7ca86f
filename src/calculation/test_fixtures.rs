//! Reference tables shared by the calculation unit tests.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::ReferenceDataProvider;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    NiCategory, NiCategoryRateTable, NiCategoryRatesEntry, NiThresholdEntry, NiThresholdSet,
    NiThresholdType, PayFrequency, TaxYear,
};

use super::{NiCalculator, NiPeriodThresholdSet};

pub(crate) fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn threshold_set(year: i32, values: &[(NiThresholdType, i64)]) -> NiThresholdSet {
    let entries = values
        .iter()
        .map(|(threshold_type, value)| NiThresholdEntry {
            threshold_type: *threshold_type,
            annual_value: Decimal::from(*value),
        })
        .collect();
    NiThresholdSet::new(TaxYear::starting(year), entries).unwrap()
}

/// 2022-23 thresholds in force from 6 July 2022.
pub(crate) fn thresholds_2022() -> NiThresholdSet {
    threshold_set(
        2022,
        &[
            (NiThresholdType::Lel, 6396),
            (NiThresholdType::Pt, 12570),
            (NiThresholdType::St, 9100),
            (NiThresholdType::Fust, 25000),
            (NiThresholdType::Ust, 50270),
            (NiThresholdType::Aust, 50270),
            (NiThresholdType::Vust, 50270),
            (NiThresholdType::Uel, 50270),
            (NiThresholdType::Dpt, 11908),
        ],
    )
}

pub(crate) fn thresholds_2024() -> NiThresholdSet {
    threshold_set(
        2024,
        &[
            (NiThresholdType::Lel, 6396),
            (NiThresholdType::Pt, 12570),
            (NiThresholdType::St, 9100),
            (NiThresholdType::Fust, 25000),
            (NiThresholdType::Ust, 50270),
            (NiThresholdType::Aust, 50270),
            (NiThresholdType::Vust, 50270),
            (NiThresholdType::Uel, 50270),
            (NiThresholdType::Izust, 25000),
        ],
    )
}

fn rates(ee_main: &str, ee_upper: &str, er_lower: &str, er_upper: &str) -> NiCategoryRatesEntry {
    NiCategoryRatesEntry {
        employee_rate_pt_to_uel: dec(ee_main),
        employee_rate_above_uel: dec(ee_upper),
        employer_rate_st_to_fust: dec(er_lower),
        employer_rate_fust_to_uel: dec(er_upper),
        employer_rate_above_uel: dec(er_upper),
    }
}

pub(crate) fn rates_2024() -> NiCategoryRateTable {
    NiCategoryRateTable::new(
        TaxYear::starting(2024),
        HashMap::from([
            (NiCategory::A, rates("0.08", "0.02", "0.138", "0.138")),
            (NiCategory::B, rates("0.0185", "0.02", "0.138", "0.138")),
            (NiCategory::C, rates("0", "0", "0.138", "0.138")),
            (NiCategory::F, rates("0.08", "0.02", "0", "0.138")),
            (NiCategory::N, rates("0.08", "0.02", "0", "0.138")),
            (NiCategory::X, rates("0", "0", "0", "0")),
            (
                NiCategory::H,
                NiCategoryRatesEntry {
                    employer_rate_fust_to_uel: Decimal::ZERO,
                    ..rates("0.08", "0.02", "0", "0.138")
                },
            ),
            (
                NiCategory::M,
                NiCategoryRatesEntry {
                    employer_rate_fust_to_uel: Decimal::ZERO,
                    ..rates("0.08", "0.02", "0", "0.138")
                },
            ),
        ]),
    )
    .unwrap()
}

/// 2022-23 rates in force from 6 November 2022.
pub(crate) fn rates_2022() -> NiCategoryRateTable {
    NiCategoryRateTable::new(
        TaxYear::starting(2022),
        HashMap::from([
            (NiCategory::A, rates("0.12", "0.02", "0.138", "0.138")),
            (NiCategory::C, rates("0", "0", "0.138", "0.138")),
        ]),
    )
    .unwrap()
}

/// 2022-23 directors' annual rates, blending the rates either side of 6 November 2022.
pub(crate) fn directors_rates_2022() -> NiCategoryRateTable {
    NiCategoryRateTable::new(
        TaxYear::starting(2022),
        HashMap::from([
            (NiCategory::A, rates("0.1273", "0.0273", "0.1453", "0.1453")),
            (NiCategory::C, rates("0", "0", "0.1453", "0.1453")),
        ]),
    )
    .unwrap()
}

pub(crate) fn calculator_2024(frequency: PayFrequency, is_final_pay_period: bool) -> NiCalculator {
    let thresholds = thresholds_2024();
    let period_thresholds = NiPeriodThresholdSet::new(&thresholds, frequency, 1).unwrap();
    NiCalculator::new(
        thresholds,
        period_thresholds,
        rates_2024(),
        rates_2024(),
        dec("0.138"),
        is_final_pay_period,
    )
}

pub(crate) fn calculator_2022(frequency: PayFrequency, is_final_pay_period: bool) -> NiCalculator {
    let thresholds = thresholds_2022();
    let period_thresholds = NiPeriodThresholdSet::new(&thresholds, frequency, 1).unwrap();
    NiCalculator::new(
        thresholds,
        period_thresholds,
        rates_2022(),
        directors_rates_2022(),
        dec("0.1453"),
        is_final_pay_period,
    )
}

/// In-memory reference data for a single tax year.
pub(crate) struct FixtureReferenceData {
    thresholds: NiThresholdSet,
    rates: NiCategoryRateTable,
    directors_rates: NiCategoryRateTable,
    class1a_rate: Decimal,
}

impl FixtureReferenceData {
    pub(crate) fn year_2024() -> Self {
        Self {
            thresholds: thresholds_2024(),
            rates: rates_2024(),
            directors_rates: rates_2024(),
            class1a_rate: dec("0.138"),
        }
    }

    fn check(&self, date: NaiveDate) -> EngineResult<()> {
        if TaxYear::from_date(date) == self.thresholds.tax_year() {
            Ok(())
        } else {
            Err(EngineError::ReferenceDataNotFound {
                description: "NI reference data".to_string(),
                date,
            })
        }
    }
}

impl ReferenceDataProvider for FixtureReferenceData {
    fn ni_thresholds(&self, date: NaiveDate) -> EngineResult<&NiThresholdSet> {
        self.check(date).map(|_| &self.thresholds)
    }

    fn ni_rates(&self, date: NaiveDate) -> EngineResult<&NiCategoryRateTable> {
        self.check(date).map(|_| &self.rates)
    }

    fn ni_directors_rates(&self, _tax_year: TaxYear) -> EngineResult<&NiCategoryRateTable> {
        Ok(&self.directors_rates)
    }

    fn class1a_rate(&self, _tax_year: TaxYear) -> EngineResult<Decimal> {
        Ok(self.class1a_rate)
    }
}
