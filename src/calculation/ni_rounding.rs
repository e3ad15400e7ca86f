//! The NI contribution rounding rule.
//!
//! Contributions are not rounded half-up. The amount is truncated to pence,
//! and the next digit decides: a remainder of up to and including half a
//! penny is dropped, anything more rounds half-up. Only the third decimal
//! place is inspected, so 10.1259 becomes 10.12.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{Money, MoneyRounding};

/// Half a penny.
const HALF_PENNY: Decimal = Decimal::from_parts(5, 0, 0, false, 3);

/// Rounds an NI contribution to pence.
///
/// Returns `InvalidArgument` for negative amounts.
///
/// # Examples
///
/// ```
/// use payroll_ni_engine::calculation::ni_round;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s| Decimal::from_str(s).unwrap();
/// assert_eq!(ni_round(dec("10.125")).unwrap(), dec("10.12"));
/// assert_eq!(ni_round(dec("10.126")).unwrap(), dec("10.13"));
/// ```
pub fn ni_round(value: Money) -> EngineResult<Money> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(EngineError::invalid_argument(
            "value",
            format!("NI rounding requires a non-negative amount, got {}", value),
        ));
    }

    let pence = value.truncate_dp(2);
    let remainder = value.truncate_dp(3) - pence;

    if remainder <= HALF_PENNY {
        Ok(pence)
    } else {
        Ok(value.round_half_up(2))
    }
}
