//! Year-to-date payroll history.

use serde::{Deserialize, Serialize};

use crate::calculation::{Deduction, EmployeePayRunResult};

use super::{Money, NiYtdHistory, PensionTaxTreatment, StatutoryPayments};

/// An employee's payroll totals for the tax year so far.
///
/// Values are immutable; [`EmployeePayrollHistoryYtd::apply`] returns the
/// totals with one more period added. The totals always equal the sum of
/// every result applied since the start of the year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeePayrollHistoryYtd {
    /// Gross pay.
    pub gross_pay: Money,
    /// Gross pay less salary exchange and net pay pension contributions.
    pub working_gross_pay: Money,
    /// Taxable pay.
    pub taxable_pay: Money,
    /// Nicable pay.
    pub nicable_pay: Money,
    /// Pensionable pay.
    pub pensionable_pay: Money,
    /// Income tax deducted.
    pub tax_paid: Money,
    /// Tax not deducted because of the regulatory limit.
    pub tax_unpaid_due_to_regulatory_limit: Money,
    /// NI by category.
    pub ni_history: NiYtdHistory,
    /// Employee pension contributions under a net pay arrangement.
    pub employee_pension_contribution_under_net_pay: Money,
    /// Employee pension contributions under relief at source.
    pub employee_pension_contribution_under_relief_at_source: Money,
    /// Employer pension contributions.
    pub employer_pension_contribution: Money,
    /// Salary given up under salary exchange.
    pub salary_exchanged: Money,
    /// Employer NI saved through salary exchange.
    pub employer_ni_savings: Money,
    /// Student loan repayments.
    pub student_loan_deductions: Money,
    /// Postgraduate loan repayments.
    pub postgraduate_loan_deductions: Money,
    /// Attachment of earnings deductions.
    pub attachment_order_deductions: Money,
    /// Payrolled benefits in kind.
    pub payrolled_benefits: Money,
    /// Statutory payments.
    pub statutory_payments: StatutoryPayments,
}

impl EmployeePayrollHistoryYtd {
    /// Returns these totals with `result` added.
    pub fn apply(&self, result: &EmployeePayRunResult) -> Self {
        let figures = &result.figures;

        let (under_net_pay, under_ras, employer_pension, exchanged) = match &result.pension_result
        {
            Some(pension) => {
                let employee = pension.employee_contribution;
                let (net_pay, ras) = match pension.tax_treatment {
                    PensionTaxTreatment::NetPayArrangement => (employee, Money::ZERO),
                    PensionTaxTreatment::ReliefAtSource => (Money::ZERO, employee),
                };
                (
                    net_pay,
                    ras,
                    pension.employer_contribution,
                    pension.salary_exchanged_amount.unwrap_or_default(),
                )
            }
            None => (Money::ZERO, Money::ZERO, Money::ZERO, Money::ZERO),
        };

        let (student_loan, postgraduate_loan) = result
            .student_loan_result
            .map(|r| (r.student_loan_deduction, r.postgraduate_loan_deduction))
            .unwrap_or_default();

        let attachments = result
            .attachment_order_result
            .as_ref()
            .map(Deduction::total_deduction)
            .unwrap_or_default();

        Self {
            gross_pay: self.gross_pay + figures.gross_pay,
            working_gross_pay: self.working_gross_pay + figures.working_gross_pay,
            taxable_pay: self.taxable_pay + figures.taxable_pay,
            nicable_pay: self.nicable_pay + figures.nicable_pay,
            pensionable_pay: self.pensionable_pay + figures.pensionable_pay,
            tax_paid: self.tax_paid + result.tax_result.tax_due,
            tax_unpaid_due_to_regulatory_limit: self.tax_unpaid_due_to_regulatory_limit
                + result.tax_result.tax_unpaid_due_to_regulatory_limit,
            ni_history: self.ni_history.add(&result.ni_result),
            employee_pension_contribution_under_net_pay: self
                .employee_pension_contribution_under_net_pay
                + under_net_pay,
            employee_pension_contribution_under_relief_at_source: self
                .employee_pension_contribution_under_relief_at_source
                + under_ras,
            employer_pension_contribution: self.employer_pension_contribution + employer_pension,
            salary_exchanged: self.salary_exchanged + exchanged,
            employer_ni_savings: self.employer_ni_savings + result.employer_ni_saving,
            student_loan_deductions: self.student_loan_deductions + student_loan,
            postgraduate_loan_deductions: self.postgraduate_loan_deductions + postgraduate_loan,
            attachment_order_deductions: self.attachment_order_deductions + attachments,
            payrolled_benefits: self.payrolled_benefits + figures.payrolled_benefits,
            statutory_payments: self.statutory_payments.add(&result.statutory_payments),
        }
    }
}
