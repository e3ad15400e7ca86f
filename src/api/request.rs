//! Request types for the NI calculation API.
//!
//! This module defines the JSON request structures for the `/ni/calculate`
//! and `/ni/directors` endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::NiEarningsBreakdown;
use crate::error::{EngineError, EngineResult};
use crate::models::{DirectorsNiMethod, NiCategory, PayDate, PayFrequency};

fn default_periods() -> u32 {
    1
}

fn non_negative(field: &str, value: Decimal) -> EngineResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(EngineError::invalid_argument(
            field,
            format!("must not be negative, got {}", value),
        ));
    }
    Ok(())
}

/// Request body for the `/ni/calculate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NiCalculationRequest {
    /// The date of payment.
    pub pay_date: NaiveDate,
    /// The payroll frequency.
    pub frequency: PayFrequency,
    /// Number of tax periods the payment covers.
    #[serde(default = "default_periods")]
    pub periods: u32,
    /// The employee's NI category letter.
    pub ni_category: NiCategory,
    /// Pay subject to NI for the period.
    pub nicable_pay: Decimal,
}

impl NiCalculationRequest {
    /// The pay date and frequency.
    pub fn pay_date(&self) -> PayDate {
        PayDate::new(self.pay_date, self.frequency)
    }

    /// Rejects negative pay.
    pub fn validate(&self) -> EngineResult<()> {
        non_negative("nicable_pay", self.nicable_pay)
    }
}

/// Request body for the `/ni/directors` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorsNiCalculationRequest {
    /// The date of payment.
    pub pay_date: NaiveDate,
    /// The payroll frequency.
    pub frequency: PayFrequency,
    /// The directors' calculation method.
    pub method: DirectorsNiMethod,
    /// The director's NI category letter.
    pub ni_category: NiCategory,
    /// Pay subject to NI for this period.
    pub period_pay: Decimal,
    /// Nicable pay earlier in the tax year.
    #[serde(default)]
    pub ytd_pay_before_period: Decimal,
    /// Employee NI already paid this tax year.
    #[serde(default)]
    pub ytd_employee_ni: Decimal,
    /// Employer NI already paid this tax year.
    #[serde(default)]
    pub ytd_employer_ni: Decimal,
    /// Fraction of the year remaining when the director was appointed.
    #[serde(default)]
    pub pro_rata_factor: Option<Decimal>,
    /// Earnings breakdown already reported this tax year.
    #[serde(default)]
    pub ytd_earnings_breakdown: Option<NiEarningsBreakdown>,
}

impl DirectorsNiCalculationRequest {
    /// The pay date and frequency.
    pub fn pay_date(&self) -> PayDate {
        PayDate::new(self.pay_date, self.frequency)
    }

    /// Rejects negative pay figures.
    pub fn validate(&self) -> EngineResult<()> {
        non_negative("period_pay", self.period_pay)?;
        non_negative("ytd_pay_before_period", self.ytd_pay_before_period)
    }
}
