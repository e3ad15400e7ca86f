//! NI calculation result types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Money, NiCategory, NiCategoryRatesEntry};

use super::NiPeriodThresholdSet;

/// How nicable pay splits across the NI thresholds.
///
/// The first six fields partition the pay; `earnings_above_st_up_to_and_including_uel`
/// is a convenience total of the three bands between ST and UEL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NiEarningsBreakdown {
    /// Earnings up to and including the Lower Earnings Limit.
    pub earnings_up_to_and_including_lel: Money,
    /// Earnings above LEL up to and including ST.
    pub earnings_above_lel_up_to_and_including_st: Money,
    /// Earnings above ST up to and including PT.
    pub earnings_above_st_up_to_and_including_pt: Money,
    /// Earnings above PT up to and including FUST.
    pub earnings_above_pt_up_to_and_including_fust: Money,
    /// Earnings above FUST up to and including UEL.
    pub earnings_above_fust_up_to_and_including_uel: Money,
    /// Earnings above the Upper Earnings Limit.
    pub earnings_above_uel: Money,
    /// Earnings above ST up to and including UEL.
    pub earnings_above_st_up_to_and_including_uel: Money,
}

impl NiEarningsBreakdown {
    /// Sum of the six partitioning bands.
    pub fn total(&self) -> Money {
        self.earnings_up_to_and_including_lel
            + self.earnings_above_lel_up_to_and_including_st
            + self.earnings_above_st_up_to_and_including_pt
            + self.earnings_above_pt_up_to_and_including_fust
            + self.earnings_above_fust_up_to_and_including_uel
            + self.earnings_above_uel
    }

    /// Earnings above LEL up to and including PT, as reported on the FPS.
    pub fn earnings_above_lel_up_to_and_including_pt(&self) -> Money {
        self.earnings_above_lel_up_to_and_including_st + self.earnings_above_st_up_to_and_including_pt
    }

    /// Earnings above PT up to and including UEL, as reported on the FPS.
    pub fn earnings_above_pt_up_to_and_including_uel(&self) -> Money {
        self.earnings_above_pt_up_to_and_including_fust
            + self.earnings_above_fust_up_to_and_including_uel
    }

    /// Band-by-band difference `self - earlier`.
    pub fn difference(&self, earlier: &NiEarningsBreakdown) -> NiEarningsBreakdown {
        NiEarningsBreakdown {
            earnings_up_to_and_including_lel: self.earnings_up_to_and_including_lel
                - earlier.earnings_up_to_and_including_lel,
            earnings_above_lel_up_to_and_including_st: self
                .earnings_above_lel_up_to_and_including_st
                - earlier.earnings_above_lel_up_to_and_including_st,
            earnings_above_st_up_to_and_including_pt: self.earnings_above_st_up_to_and_including_pt
                - earlier.earnings_above_st_up_to_and_including_pt,
            earnings_above_pt_up_to_and_including_fust: self
                .earnings_above_pt_up_to_and_including_fust
                - earlier.earnings_above_pt_up_to_and_including_fust,
            earnings_above_fust_up_to_and_including_uel: self
                .earnings_above_fust_up_to_and_including_uel
                - earlier.earnings_above_fust_up_to_and_including_uel,
            earnings_above_uel: self.earnings_above_uel - earlier.earnings_above_uel,
            earnings_above_st_up_to_and_including_uel: self
                .earnings_above_st_up_to_and_including_uel
                - earlier.earnings_above_st_up_to_and_including_uel,
        }
    }

    /// Band-by-band sum.
    pub fn add(&self, other: &NiEarningsBreakdown) -> NiEarningsBreakdown {
        NiEarningsBreakdown {
            earnings_up_to_and_including_lel: self.earnings_up_to_and_including_lel
                + other.earnings_up_to_and_including_lel,
            earnings_above_lel_up_to_and_including_st: self
                .earnings_above_lel_up_to_and_including_st
                + other.earnings_above_lel_up_to_and_including_st,
            earnings_above_st_up_to_and_including_pt: self.earnings_above_st_up_to_and_including_pt
                + other.earnings_above_st_up_to_and_including_pt,
            earnings_above_pt_up_to_and_including_fust: self
                .earnings_above_pt_up_to_and_including_fust
                + other.earnings_above_pt_up_to_and_including_fust,
            earnings_above_fust_up_to_and_including_uel: self
                .earnings_above_fust_up_to_and_including_uel
                + other.earnings_above_fust_up_to_and_including_uel,
            earnings_above_uel: self.earnings_above_uel + other.earnings_above_uel,
            earnings_above_st_up_to_and_including_uel: self
                .earnings_above_st_up_to_and_including_uel
                + other.earnings_above_st_up_to_and_including_uel,
        }
    }
}

/// The outcome of one NI calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NiCalculationResult {
    /// The NI category calculated.
    pub ni_category: NiCategory,
    /// The nicable pay for the period.
    pub nicable_pay: Money,
    /// The rates applied.
    pub rates_used: NiCategoryRatesEntry,
    /// The thresholds applied (period values, or annual values for directors).
    pub thresholds_used: NiPeriodThresholdSet,
    /// How the pay splits across the thresholds.
    pub earnings_breakdown: NiEarningsBreakdown,
    /// Employee (primary) contribution.
    pub employee_contribution: Money,
    /// Employer (secondary) contribution.
    pub employer_contribution: Money,
    /// Employee plus employer contribution.
    pub total_contribution: Money,
    /// True when pay is below the LEL and nothing needs to be reported.
    pub no_recording_required: bool,
    /// Employer Class 1A contribution on payrolled benefits, if any.
    pub class1a_contribution: Option<Money>,
}

impl NiCalculationResult {
    /// A result for pay below the Lower Earnings Limit: no contributions and no breakdown.
    pub fn no_recording_required(
        ni_category: NiCategory,
        nicable_pay: Money,
        rates_used: NiCategoryRatesEntry,
        thresholds_used: NiPeriodThresholdSet,
    ) -> Self {
        Self {
            ni_category,
            nicable_pay,
            rates_used,
            thresholds_used,
            earnings_breakdown: NiEarningsBreakdown::default(),
            employee_contribution: Decimal::ZERO,
            employer_contribution: Decimal::ZERO,
            total_contribution: Decimal::ZERO,
            no_recording_required: true,
            class1a_contribution: None,
        }
    }
}
