//! Core data models for the payroll NI engine.
//!
//! This module contains the reference data types (tax years, NI categories,
//! thresholds and rates), the pay run input contract, and the immutable
//! year-to-date histories.

mod money;
mod ni_category;
mod ni_rates;
mod ni_thresholds;
mod ni_ytd;
mod pay_run_input;
mod payroll_ytd;
mod tax_year;

pub use money::{Money, MoneyRounding};
pub use ni_category::{DirectorsNiMethod, NiCategory};
pub use ni_rates::{NiCategoryRateTable, NiCategoryRatesEntry};
pub use ni_thresholds::{NiThresholdEntry, NiThresholdSet, NiThresholdType};
pub use ni_ytd::{NiYtdHistory, NiYtdHistoryEntry};
pub use pay_run_input::{
    AttachmentOrder, DeductionItem, DirectorDetails, EarningsBasis, EarningsItem,
    EmployeeDetails, EmployeePayRunInputEntry, PensionContributionLevels, PensionMembership,
    PensionTaxTreatment, StatutoryPayments, StudentLoanInfo, StudentLoanPlan, TaxCode, TaxRegime,
};
pub use payroll_ytd::EmployeePayrollHistoryYtd;
pub use tax_year::{PayDate, PayFrequency, TaxYear};
