//! Pay run result for one employee.

use serde::Serialize;

use crate::models::{EmployeePayrollHistoryYtd, Money, StatutoryPayments};

use super::{
    AttachmentOrderCalculationResult, NiCalculationResult, PayPeriodFigures,
    PensionContributionCalculationResult, StudentLoanCalculationResult, TaxCalculationResult,
};

/// The outcome of processing one employee's pay run entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeePayRunResult {
    /// Payroll identifier.
    pub employee_id: String,
    /// Final period figures, after salary exchange and net pay pension adjustments.
    pub figures: PayPeriodFigures,
    /// NI on the final nicable pay.
    pub ni_result: NiCalculationResult,
    /// Employer NI saved through salary exchange; zero without it.
    pub employer_ni_saving: Money,
    /// Pension contributions, if the employee is a member.
    pub pension_result: Option<PensionContributionCalculationResult>,
    /// Income tax.
    pub tax_result: TaxCalculationResult,
    /// Loan repayments, if the employee has loans.
    pub student_loan_result: Option<StudentLoanCalculationResult>,
    /// Attachment of earnings deductions, if any orders are held.
    pub attachment_order_result: Option<AttachmentOrderCalculationResult>,
    /// Statutory payments included in gross pay.
    pub statutory_payments: StatutoryPayments,
    /// Deductions taken from net pay.
    pub other_deductions: Money,
    /// Take-home pay.
    pub net_pay: Money,
    /// Year-to-date figures including this period.
    pub updated_ytd: EmployeePayrollHistoryYtd,
}
