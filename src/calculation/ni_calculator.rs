//! Class 1 National Insurance contribution calculation.
//!
//! ## Algorithm
//!
//! Pay below the Lower Earnings Limit needs no recording and attracts no
//! contributions. Otherwise pay is split into bands between successive
//! thresholds:
//!
//! | Band        | Employee rate     | Employer rate     |
//! |-------------|-------------------|-------------------|
//! | LEL to ST   | nil               | nil               |
//! | ST to PT    | nil               | ST to FUST rate   |
//! | PT to FUST  | PT to UEL rate    | ST to FUST rate   |
//! | FUST to UEL | PT to UEL rate    | FUST to UEL rate  |
//! | above UEL   | above UEL rate    | above UEL rate    |
//!
//! Each contribution is the NI-rounded product of the band earnings and the
//! rate, using [`ni_round`] rather than ordinary rounding.
//!
//! Company directors have an annual earnings period. Under the standard
//! method every period is calculated on cumulative pay against annual
//! thresholds, and the period's liability is the annual figure less what has
//! already been paid. Under the alternative method directors are treated as
//! employees until the final period of the year, when the annual
//! recalculation is made.

use rust_decimal::Decimal;

use crate::config::ReferenceDataProvider;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    DirectorsNiMethod, Money, MoneyRounding, NiCategory, NiCategoryRateTable,
    NiCategoryRatesEntry, NiThresholdSet, NiThresholdType, PayDate,
};

use super::ni_rounding::ni_round;
use super::{NiCalculationResult, NiEarningsBreakdown, NiPeriodThresholdSet};

/// The stepped bands between LEL and UEL, in order, as (lower, upper) pairs.
const BAND_THRESHOLDS: [(NiThresholdType, NiThresholdType); 4] = [
    (NiThresholdType::Lel, NiThresholdType::St),
    (NiThresholdType::St, NiThresholdType::Pt),
    (NiThresholdType::Pt, NiThresholdType::Fust),
    (NiThresholdType::Fust, NiThresholdType::Uel),
];

/// Calculates Class 1 NI contributions for one tax year, pay frequency and period count.
///
/// A calculator holds only immutable reference data, so it can be shared
/// between threads and used for any number of employees.
///
/// # Example
///
/// ```no_run
/// use payroll_ni_engine::calculation::NiCalculator;
/// use payroll_ni_engine::config::ConfigLoader;
/// use payroll_ni_engine::models::{NiCategory, PayDate, PayFrequency};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let reference_data = ConfigLoader::load("./config/uk")?;
/// let pay_date = PayDate::new(NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(), PayFrequency::Monthly);
/// let calculator = NiCalculator::for_pay_date(&reference_data, pay_date, 1)?;
///
/// let result = calculator.calculate(NiCategory::A, Decimal::from(3000))?;
/// println!("Employee NI: £{}", result.employee_contribution);
/// # Ok::<(), payroll_ni_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct NiCalculator {
    thresholds: NiThresholdSet,
    period_thresholds: NiPeriodThresholdSet,
    rates: NiCategoryRateTable,
    directors_rates: NiCategoryRateTable,
    class1a_rate: Decimal,
    is_final_pay_period: bool,
}

impl NiCalculator {
    /// Creates a calculator from already-resolved reference data.
    pub fn new(
        thresholds: NiThresholdSet,
        period_thresholds: NiPeriodThresholdSet,
        rates: NiCategoryRateTable,
        directors_rates: NiCategoryRateTable,
        class1a_rate: Decimal,
        is_final_pay_period: bool,
    ) -> Self {
        Self {
            thresholds,
            period_thresholds,
            rates,
            directors_rates,
            class1a_rate,
            is_final_pay_period,
        }
    }

    /// Creates a calculator using the thresholds and rates in force on `pay_date`.
    ///
    /// `periods` is the number of tax periods the payment covers (normally 1).
    pub fn for_pay_date(
        reference_data: &dyn ReferenceDataProvider,
        pay_date: PayDate,
        periods: u32,
    ) -> EngineResult<Self> {
        let tax_year = pay_date.tax_year();
        let thresholds = reference_data.ni_thresholds(pay_date.date)?;
        let period_thresholds =
            NiPeriodThresholdSet::new(thresholds, pay_date.frequency, periods)?;

        Ok(Self::new(
            thresholds.clone(),
            period_thresholds,
            reference_data.ni_rates(pay_date.date)?.clone(),
            reference_data.ni_directors_rates(tax_year)?.clone(),
            reference_data.class1a_rate(tax_year)?,
            pay_date.is_final_period(),
        ))
    }

    /// Returns true if the calculator was built for the last pay period of the tax year.
    pub fn is_final_pay_period(&self) -> bool {
        self.is_final_pay_period
    }

    /// The period thresholds used by [`NiCalculator::calculate`].
    pub fn period_thresholds(&self) -> &NiPeriodThresholdSet {
        &self.period_thresholds
    }

    /// Calculates NI for an employee's nicable pay in the period.
    ///
    /// Returns `NiRatesNotFound` if the category has no rates this year.
    pub fn calculate(
        &self,
        category: NiCategory,
        nicable_pay: Money,
    ) -> EngineResult<NiCalculationResult> {
        let rates = self.rates.get(category)?;

        let Some(breakdown) = earnings_breakdown(nicable_pay, &self.period_thresholds)? else {
            return Ok(NiCalculationResult::no_recording_required(
                category,
                nicable_pay,
                *rates,
                self.period_thresholds.clone(),
            ));
        };

        let (employee_contribution, employer_contribution) = contributions(&breakdown, rates)?;

        Ok(NiCalculationResult {
            ni_category: category,
            nicable_pay,
            rates_used: *rates,
            thresholds_used: self.period_thresholds.clone(),
            earnings_breakdown: breakdown,
            employee_contribution,
            employer_contribution,
            total_contribution: employee_contribution + employer_contribution,
            no_recording_required: false,
            class1a_contribution: None,
        })
    }

    /// Calculates NI for a company director.
    ///
    /// # Arguments
    ///
    /// * `method` - The directors' calculation method
    /// * `category` - The NI category
    /// * `period_pay` - Nicable pay in this period
    /// * `ytd_pay_before_period` - Nicable pay earlier in the tax year
    /// * `ytd_employee_ni` - Employee NI already paid this tax year
    /// * `ytd_employer_ni` - Employer NI already paid this tax year
    /// * `pro_rata_factor` - Fraction of the year remaining when the director was appointed
    /// * `ytd_earnings_breakdown` - Earnings breakdown already reported this tax year
    ///
    /// Under the alternative method, outside the final period, this is the
    /// same as [`NiCalculator::calculate`] on `period_pay`. Otherwise
    /// contributions are the annual liability on cumulative pay, using the
    /// directors' rate table, less what has already been paid; they may be
    /// negative where earlier periods overpaid.
    ///
    /// The period's breakdown is the annual breakdown of cumulative pay less
    /// `ytd_earnings_breakdown`, so the year's breakdowns sum to the annual
    /// one. Without a reported breakdown, the annual breakdown of
    /// `ytd_pay_before_period` is used, which is only right when every earlier
    /// period was also calculated on annual thresholds.
    #[allow(clippy::too_many_arguments)]
    pub fn calculate_directors(
        &self,
        method: DirectorsNiMethod,
        category: NiCategory,
        period_pay: Money,
        ytd_pay_before_period: Money,
        ytd_employee_ni: Money,
        ytd_employer_ni: Money,
        pro_rata_factor: Option<Decimal>,
        ytd_earnings_breakdown: Option<&NiEarningsBreakdown>,
    ) -> EngineResult<NiCalculationResult> {
        if method == DirectorsNiMethod::Alternative && !self.is_final_pay_period {
            return self.calculate(category, period_pay);
        }

        let rates = self.directors_rates.get(category)?;
        let annual_thresholds =
            NiPeriodThresholdSet::annual_for_directors(&self.thresholds, pro_rata_factor)?;

        let cumulative_pay = ytd_pay_before_period.checked_add(period_pay).ok_or_else(|| {
            EngineError::invalid_argument(
                "ytd_pay_before_period",
                "cumulative pay is too large to represent",
            )
        })?;
        let cumulative_breakdown = earnings_breakdown(cumulative_pay, &annual_thresholds)?;
        let prior_breakdown = match ytd_earnings_breakdown {
            Some(reported) => *reported,
            None => earnings_breakdown(ytd_pay_before_period, &annual_thresholds)?
                .unwrap_or_default(),
        };

        let (annual_employee, annual_employer) = match &cumulative_breakdown {
            Some(breakdown) => contributions(breakdown, rates)?,
            None => (Decimal::ZERO, Decimal::ZERO),
        };

        let employee_contribution = outstanding(annual_employee, ytd_employee_ni, "ytd_employee_ni")?;
        let employer_contribution = outstanding(annual_employer, ytd_employer_ni, "ytd_employer_ni")?;

        // A refund of NI paid earlier in the year must still be reported.
        let no_recording_required = cumulative_breakdown.is_none()
            && employee_contribution.is_zero()
            && employer_contribution.is_zero();

        Ok(NiCalculationResult {
            ni_category: category,
            nicable_pay: period_pay,
            rates_used: *rates,
            thresholds_used: annual_thresholds,
            earnings_breakdown: cumulative_breakdown
                .unwrap_or_default()
                .difference(&prior_breakdown),
            employee_contribution,
            employer_contribution,
            total_contribution: employee_contribution + employer_contribution,
            no_recording_required,
            class1a_contribution: None,
        })
    }

    /// Employer Class 1A NI on payrolled benefits in kind, rounded half-up to pence.
    pub fn calculate_class1a(&self, payrolled_benefits: Money) -> EngineResult<Money> {
        if payrolled_benefits.is_sign_negative() && !payrolled_benefits.is_zero() {
            return Err(EngineError::invalid_argument(
                "payrolled_benefits",
                "must not be negative",
            ));
        }
        Ok((payrolled_benefits * self.class1a_rate).round_half_up(2))
    }
}

/// Splits pay across the thresholds, or returns `None` if it is below the LEL.
fn earnings_breakdown(
    pay: Money,
    thresholds: &NiPeriodThresholdSet,
) -> EngineResult<Option<NiEarningsBreakdown>> {
    let lel = thresholds.get_threshold1(NiThresholdType::Lel)?;
    let uel = thresholds.get_threshold1(NiThresholdType::Uel)?;

    let earnings_above_lel = pay - lel;
    if earnings_above_lel < Decimal::ZERO {
        return Ok(None);
    }

    let mut bands = Vec::with_capacity(BAND_THRESHOLDS.len());
    let mut running_excess = earnings_above_lel;
    let mut exhausted = false;

    for (lower, upper) in BAND_THRESHOLDS {
        if exhausted {
            bands.push(Decimal::ZERO);
            continue;
        }

        let earnings_above_upper = (pay - thresholds.get_threshold1(upper)?).max(Decimal::ZERO);
        let band = (running_excess.max(Decimal::ZERO) - earnings_above_upper).truncate_dp(4);
        if band < Decimal::ZERO {
            return Err(EngineError::InvariantViolation {
                message: format!("threshold {} is above {}", lower, upper),
            });
        }

        bands.push(band);
        exhausted = band.is_zero() && earnings_above_upper.is_zero();
        running_excess = earnings_above_upper;
    }

    let [lel_to_st, st_to_pt, pt_to_fust, fust_to_uel] = bands[..] else {
        return Err(EngineError::InvariantViolation {
            message: format!(
                "expected {} earnings bands, calculated {}",
                BAND_THRESHOLDS.len(),
                bands.len()
            ),
        });
    };

    Ok(Some(NiEarningsBreakdown {
        earnings_up_to_and_including_lel: lel,
        earnings_above_lel_up_to_and_including_st: lel_to_st,
        earnings_above_st_up_to_and_including_pt: st_to_pt,
        earnings_above_pt_up_to_and_including_fust: pt_to_fust,
        earnings_above_fust_up_to_and_including_uel: fust_to_uel,
        earnings_above_uel: (pay - uel).max(Decimal::ZERO),
        earnings_above_st_up_to_and_including_uel: st_to_pt + pt_to_fust + fust_to_uel,
    }))
}

/// Employee and employer contributions for a breakdown.
fn contributions(
    breakdown: &NiEarningsBreakdown,
    rates: &NiCategoryRatesEntry,
) -> EngineResult<(Money, Money)> {
    let employee = ni_round(
        (breakdown.earnings_above_pt_up_to_and_including_fust
            + breakdown.earnings_above_fust_up_to_and_including_uel)
            * rates.employee_rate_pt_to_uel,
    )? + ni_round(breakdown.earnings_above_uel * rates.employee_rate_above_uel)?;

    let employer = ni_round(
        (breakdown.earnings_above_st_up_to_and_including_pt
            + breakdown.earnings_above_pt_up_to_and_including_fust)
            * rates.employer_rate_st_to_fust
            + breakdown.earnings_above_fust_up_to_and_including_uel
                * rates.employer_rate_fust_to_uel,
    )? + ni_round(breakdown.earnings_above_uel * rates.employer_rate_above_uel)?;

    Ok((employee, employer))
}

/// The annual liability less what has already been paid.
fn outstanding(annual: Money, paid: Money, field: &str) -> EngineResult<Money> {
    annual.checked_sub(paid).ok_or_else(|| {
        EngineError::invalid_argument(field, "year-to-date NI is too large to represent")
    })
}
