//! Calculators the pay run depends on but does not implement.
//!
//! Income tax, student loans, pensions and attachment orders each have their
//! own statutory rules. The pay run talks to them through these traits and
//! only relies on the totals they report.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{
    AttachmentOrder, EarningsBasis, EmployeePayrollHistoryYtd, Money, MoneyRounding, PayDate,
    PensionContributionLevels, PensionTaxTreatment, StudentLoanInfo, TaxCode,
};

/// Pay figures for the period, as seen by each calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriodFigures {
    /// The pay date.
    pub pay_date: PayDate,
    /// Gross pay after deductions that reduce gross.
    pub gross_pay: Money,
    /// Gross pay less salary exchange and net pay pension contributions.
    pub working_gross_pay: Money,
    /// Pay subject to income tax, including payrolled benefits.
    pub taxable_pay: Money,
    /// Pay subject to NI.
    pub nicable_pay: Money,
    /// Pay pension contributions are calculated on.
    pub pensionable_pay: Money,
    /// Benefits in kind taxed through the payroll.
    pub payrolled_benefits: Money,
}

/// A calculator result that deducts money from the employee's pay.
pub trait Deduction {
    /// The amount taken from the employee's pay.
    fn total_deduction(&self) -> Money;
}

/// Income tax for the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculationResult {
    /// Tax deducted this period; negative for a refund.
    pub tax_due: Money,
    /// Tax that could not be taken because of the 50% regulatory limit.
    pub tax_unpaid_due_to_regulatory_limit: Money,
}

impl Deduction for TaxCalculationResult {
    fn total_deduction(&self) -> Money {
        self.tax_due
    }
}

/// Student and postgraduate loan repayments for the period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentLoanCalculationResult {
    /// Undergraduate plan repayment.
    pub student_loan_deduction: Money,
    /// Postgraduate loan repayment.
    pub postgraduate_loan_deduction: Money,
}

impl Deduction for StudentLoanCalculationResult {
    fn total_deduction(&self) -> Money {
        self.student_loan_deduction + self.postgraduate_loan_deduction
    }
}

/// Pension contributions for the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PensionContributionCalculationResult {
    /// How tax relief is given.
    pub tax_treatment: PensionTaxTreatment,
    /// Pay the contributions were calculated on.
    pub calculated_on: Money,
    /// Contribution deducted from the employee's pay (zero under salary exchange, AVCs aside).
    pub employee_contribution: Money,
    /// Employer contribution, including any exchanged salary and NI reinvestment.
    pub employer_contribution: Money,
    /// Salary given up in exchange for the employer contribution.
    pub salary_exchanged_amount: Option<Money>,
    /// Employer NI saving paid into the pension.
    pub employers_ni_reinvestment: Option<Money>,
}

impl Deduction for PensionContributionCalculationResult {
    fn total_deduction(&self) -> Money {
        self.employee_contribution + self.salary_exchanged_amount.unwrap_or_default()
    }
}

/// One order's deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentOrderDeduction {
    /// The order reference.
    pub reference: String,
    /// Amount deducted this period.
    pub amount: Money,
}

/// Attachment of earnings deductions for the period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentOrderCalculationResult {
    /// Deductions in the order they were applied.
    pub deductions: Vec<AttachmentOrderDeduction>,
}

impl Deduction for AttachmentOrderCalculationResult {
    fn total_deduction(&self) -> Money {
        self.deductions.iter().map(|d| d.amount).sum()
    }
}

/// Calculates PAYE income tax.
pub trait TaxCalculator: Send + Sync {
    /// Tax due for the period on `figures.taxable_pay`.
    fn calculate(
        &self,
        tax_code: &TaxCode,
        figures: &PayPeriodFigures,
        ytd: &EmployeePayrollHistoryYtd,
    ) -> EngineResult<TaxCalculationResult>;
}

/// Calculates student and postgraduate loan repayments.
pub trait StudentLoanCalculator: Send + Sync {
    /// Repayments due for the period.
    fn calculate(
        &self,
        loans: &StudentLoanInfo,
        figures: &PayPeriodFigures,
        ytd: &EmployeePayrollHistoryYtd,
    ) -> EngineResult<StudentLoanCalculationResult>;
}

/// Calculates contributions for one earnings basis and tax treatment.
pub trait PensionContributionCalculator: Send + Sync {
    /// Salary given up under salary exchange, calculated from pensionable pay alone.
    fn salary_exchanged_amount(
        &self,
        levels: &PensionContributionLevels,
        figures: &PayPeriodFigures,
    ) -> EngineResult<Money>;

    /// Contributions where the employee pays from their salary.
    fn calculate(
        &self,
        levels: &PensionContributionLevels,
        figures: &PayPeriodFigures,
    ) -> EngineResult<PensionContributionCalculationResult>;

    /// Contributions where `salary_exchanged` has been given up, plus the
    /// employer's NI reinvestment.
    fn calculate_under_salary_exchange(
        &self,
        levels: &PensionContributionLevels,
        figures: &PayPeriodFigures,
        salary_exchanged: Money,
        employers_ni_reinvestment: Money,
    ) -> EngineResult<PensionContributionCalculationResult>;
}

/// Builds pension calculators.
pub trait PensionCalculatorFactory: Send + Sync {
    /// A calculator for the earnings basis and tax treatment in force on `pay_date`.
    fn get_calculator(
        &self,
        earnings_basis: EarningsBasis,
        tax_treatment: PensionTaxTreatment,
        pay_date: PayDate,
    ) -> EngineResult<Arc<dyn PensionContributionCalculator>>;
}

/// Calculates attachment of earnings deductions.
pub trait AttachmentOrderCalculator: Send + Sync {
    /// Deductions for `orders`, applied oldest first.
    fn calculate(
        &self,
        orders: &[AttachmentOrder],
        figures: &PayPeriodFigures,
        ytd: &EmployeePayrollHistoryYtd,
    ) -> EngineResult<AttachmentOrderCalculationResult>;
}

/// The external calculators a pay run uses.
#[derive(Clone)]
pub struct PayRunCalculators {
    /// Income tax.
    pub tax: Arc<dyn TaxCalculator>,
    /// Student and postgraduate loans.
    pub student_loans: Arc<dyn StudentLoanCalculator>,
    /// Pension calculator factory.
    pub pensions: Arc<dyn PensionCalculatorFactory>,
    /// Attachment of earnings orders.
    pub attachment_orders: Arc<dyn AttachmentOrderCalculator>,
}

/// Employer NI saving reinvested into the pension, rounded half-up to pence.
pub(crate) fn ni_reinvestment(saving: Money, percentage: Option<Decimal>) -> Money {
    percentage
        .map(|p| (saving * p / Decimal::ONE_HUNDRED).round_half_up(2))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_pension_deduction_includes_exchanged_salary() {
        let result = PensionContributionCalculationResult {
            tax_treatment: PensionTaxTreatment::NetPayArrangement,
            calculated_on: dec("3000"),
            employee_contribution: dec("10"),
            employer_contribution: dec("260.35"),
            salary_exchanged_amount: Some(dec("150")),
            employers_ni_reinvestment: Some(dec("20.35")),
        };
        assert_eq!(result.total_deduction(), dec("160"));
    }

    #[test]
    fn test_attachment_orders_sum() {
        let result = AttachmentOrderCalculationResult {
            deductions: vec![
                AttachmentOrderDeduction { reference: "CO-1".into(), amount: dec("25") },
                AttachmentOrderDeduction { reference: "CO-2".into(), amount: dec("12.50") },
            ],
        };
        assert_eq!(result.total_deduction(), dec("37.50"));
        assert!(AttachmentOrderCalculationResult::default().total_deduction().is_zero());
    }

    #[test]
    fn test_ni_reinvestment_rounds_half_up() {
        // 20.70 x 50% = 10.35
        assert_eq!(ni_reinvestment(dec("20.70"), Some(dec("50"))), dec("10.35"));
        // 20.71 x 50% = 10.355
        assert_eq!(ni_reinvestment(dec("20.71"), Some(dec("50"))), dec("10.36"));
        assert!(ni_reinvestment(dec("20.71"), None).is_zero());
    }
}
