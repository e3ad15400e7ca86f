//! Calculation logic for the payroll NI engine.
//!
//! This module contains the period threshold adjustment, the NI rounding
//! rule, the Class 1 NI calculator for employees and directors, the
//! interfaces to the external tax, loan, pension and attachment order
//! calculators, and the pay run entry processor that sequences them.

mod collaborators;
mod ni_calculator;
mod ni_result;
mod ni_rounding;
mod pay_run_processor;
mod pay_run_result;
mod period_thresholds;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use collaborators::{
    AttachmentOrderCalculationResult, AttachmentOrderCalculator, AttachmentOrderDeduction,
    Deduction, PayPeriodFigures, PayRunCalculators, PensionCalculatorFactory,
    PensionContributionCalculationResult, PensionContributionCalculator,
    StudentLoanCalculationResult, StudentLoanCalculator, TaxCalculationResult, TaxCalculator,
};
pub use ni_calculator::NiCalculator;
pub use ni_result::{NiCalculationResult, NiEarningsBreakdown};
pub use ni_rounding::ni_round;
pub use pay_run_processor::PayRunEntryProcessor;
pub use pay_run_result::EmployeePayRunResult;
pub use period_thresholds::{
    NiPeriodThresholdEntry, NiPeriodThresholdSet, threshold_for_period, threshold1_for_period,
};
