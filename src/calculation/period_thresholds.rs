//! Period threshold adjustment.
//!
//! Converts annual NI thresholds into the values that apply to a pay
//! period. Division is always by the standard number of periods for the pay
//! frequency (52 for weekly, 12 for monthly and so on) scaled by the number
//! of periods being paid, never by the actual length of an individual period.
//!
//! Two values are produced for each threshold:
//!
//! - `threshold_for_period`: the quotient rounded up to the whole pound.
//! - `threshold1_for_period`: the quotient rounded half-up for a single
//!   weekly or monthly period, otherwise rounded up. These match the weekly
//!   and monthly figures HMRC publishes (e.g. a monthly ST of £758 from an
//!   annual £9,100) and are the values the contribution bands use.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Money, MoneyRounding, NiThresholdSet, NiThresholdType, PayFrequency,
};

/// One threshold expressed for a pay period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NiPeriodThresholdEntry {
    /// Which threshold this is.
    pub threshold_type: NiThresholdType,
    /// Annual value divided down and rounded up to the whole pound.
    pub threshold_for_period: Money,
    /// Annual value divided down with the weekly/monthly half-up rule.
    pub threshold1_for_period: Money,
}

/// Annual thresholds converted for a pay frequency and number of periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NiPeriodThresholdSet {
    entries: Vec<NiPeriodThresholdEntry>,
}

/// Divides an annual threshold for `periods` periods of `frequency`, rounding up.
///
/// # Example
///
/// ```
/// use payroll_ni_engine::calculation::threshold_for_period;
/// use payroll_ni_engine::models::PayFrequency;
/// use rust_decimal::Decimal;
///
/// // £9,100 a year is £758.33 a month, rounded up to £759.
/// let monthly = threshold_for_period(Decimal::from(9100), PayFrequency::Monthly, 1);
/// assert_eq!(monthly, Decimal::from(759));
/// ```
pub fn threshold_for_period(annual: Money, frequency: PayFrequency, periods: u32) -> Money {
    period_share(annual, frequency, periods).round_up(0)
}

/// Divides an annual threshold for `periods` periods of `frequency`.
///
/// Rounds half-up when paying exactly one weekly or monthly period, and up
/// in every other case.
///
/// # Example
///
/// ```
/// use payroll_ni_engine::calculation::threshold1_for_period;
/// use payroll_ni_engine::models::PayFrequency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(threshold1_for_period(Decimal::from(9100), PayFrequency::Monthly, 1), Decimal::from(758));
/// assert_eq!(threshold1_for_period(Decimal::from(9100), PayFrequency::Monthly, 2), Decimal::from(1517));
/// ```
pub fn threshold1_for_period(annual: Money, frequency: PayFrequency, periods: u32) -> Money {
    let share = period_share(annual, frequency, periods);
    let single_weekly_or_monthly =
        matches!(frequency, PayFrequency::Weekly | PayFrequency::Monthly) && periods == 1;

    if single_weekly_or_monthly {
        share.round_half_up(0)
    } else {
        share.round_up(0)
    }
}

fn period_share(annual: Money, frequency: PayFrequency, periods: u32) -> Decimal {
    annual * Decimal::from(periods) / Decimal::from(frequency.standard_periods())
}

impl NiPeriodThresholdSet {
    /// Derives period thresholds from an annual set.
    ///
    /// Returns `InvalidArgument` if `periods` is zero.
    pub fn new(
        thresholds: &NiThresholdSet,
        frequency: PayFrequency,
        periods: u32,
    ) -> EngineResult<Self> {
        if periods == 0 {
            return Err(EngineError::invalid_argument(
                "periods",
                "number of tax periods must be at least 1",
            ));
        }

        let entries = thresholds
            .iter()
            .map(|entry| NiPeriodThresholdEntry {
                threshold_type: entry.threshold_type,
                threshold_for_period: threshold_for_period(entry.annual_value, frequency, periods),
                threshold1_for_period: threshold1_for_period(
                    entry.annual_value,
                    frequency,
                    periods,
                ),
            })
            .collect();

        Ok(Self { entries })
    }

    /// Annual thresholds for a director's annual earnings period.
    ///
    /// Where the tax year defines a Directors' Primary Threshold it replaces
    /// PT. With a pro-rata factor (for a director appointed part way through
    /// the year) every value is multiplied by the factor and rounded up to
    /// the whole pound.
    ///
    /// Returns `InvalidArgument` unless `0 < factor <= 1`.
    pub fn annual_for_directors(
        thresholds: &NiThresholdSet,
        pro_rata_factor: Option<Decimal>,
    ) -> EngineResult<Self> {
        let factor = pro_rata_factor.unwrap_or(Decimal::ONE);
        if factor <= Decimal::ZERO || factor > Decimal::ONE {
            return Err(EngineError::invalid_argument(
                "pro_rata_factor",
                format!("must be greater than 0 and at most 1, got {}", factor),
            ));
        }

        let directors_pt = thresholds.get_threshold(NiThresholdType::Dpt);

        let entries = thresholds
            .iter()
            .map(|entry| {
                let annual = match (entry.threshold_type, directors_pt) {
                    (NiThresholdType::Pt, Some(dpt)) => dpt,
                    _ => entry.annual_value,
                };
                let value = (annual * factor).round_up(0);
                NiPeriodThresholdEntry {
                    threshold_type: entry.threshold_type,
                    threshold_for_period: value,
                    threshold1_for_period: value,
                }
            })
            .collect();

        Ok(Self { entries })
    }

    fn entry(&self, threshold_type: NiThresholdType) -> EngineResult<&NiPeriodThresholdEntry> {
        self.entries
            .iter()
            .find(|e| e.threshold_type == threshold_type)
            .ok_or_else(|| EngineError::InvariantViolation {
                message: format!("period threshold set has no {} entry", threshold_type),
            })
    }

    /// The rounded-up period value of a threshold.
    pub fn get_threshold(&self, threshold_type: NiThresholdType) -> EngineResult<Money> {
        self.entry(threshold_type).map(|e| e.threshold_for_period)
    }

    /// The variant-1 period value of a threshold, as used by the contribution bands.
    pub fn get_threshold1(&self, threshold_type: NiThresholdType) -> EngineResult<Money> {
        self.entry(threshold_type).map(|e| e.threshold1_for_period)
    }

    /// Iterates the entries.
    pub fn iter(&self) -> impl Iterator<Item = &NiPeriodThresholdEntry> {
        self.entries.iter()
    }
}
