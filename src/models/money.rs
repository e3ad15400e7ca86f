//! Monetary amounts and explicit rounding modes.
//!
//! All amounts are [`Decimal`] so that addition, subtraction, multiplication
//! and division never pick up binary floating-point error. Statutory rules
//! always say how to round, so rounding is spelled out at each call site via
//! [`MoneyRounding`].

use rust_decimal::{Decimal, RoundingStrategy};

/// A monetary amount in pounds sterling.
pub type Money = Decimal;

/// Rounding modes used by HMRC calculations.
///
/// # Example
///
/// ```
/// use payroll_ni_engine::models::MoneyRounding;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let amount = Decimal::from_str("1047.5").unwrap();
/// assert_eq!(amount.truncate_dp(0), Decimal::from(1047));
/// assert_eq!(amount.round_half_up(0), Decimal::from(1048));
/// assert_eq!(Decimal::from_str("758.33").unwrap().round_up(0), Decimal::from(759));
/// ```
pub trait MoneyRounding {
    /// Discards digits beyond `dp` decimal places.
    fn truncate_dp(self, dp: u32) -> Self;

    /// Rounds to `dp` decimal places, with midpoints rounded away from zero.
    fn round_half_up(self, dp: u32) -> Self;

    /// Rounds towards positive infinity at `dp` decimal places.
    fn round_up(self, dp: u32) -> Self;
}

impl MoneyRounding for Decimal {
    fn truncate_dp(self, dp: u32) -> Self {
        self.round_dp_with_strategy(dp, RoundingStrategy::ToZero)
    }

    fn round_half_up(self, dp: u32) -> Self {
        self.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
    }

    fn round_up(self, dp: u32) -> Self {
        self.round_dp_with_strategy(dp, RoundingStrategy::ToPositiveInfinity)
    }
}
