//! Pay run processing for one employee.
//!
//! ## Steps
//!
//! 1. Aggregate earnings, deductions, statutory payments and payrolled
//!    benefits into gross, taxable, nicable and pensionable pay.
//! 2. Calculate NI on the nicable pay.
//! 3. Under salary exchange, take the exchanged salary off nicable, working
//!    gross and taxable pay, calculate NI a second time, and reinvest the
//!    configured share of the employer's NI saving in the pension. There are
//!    never more than two NI calculations: the exchanged amount depends only
//!    on pensionable pay, not on NI.
//! 4. Without salary exchange, a net pay arrangement contribution reduces
//!    working gross and taxable pay, but not nicable pay.
//! 5. Income tax on the final taxable pay, then loans and attachment orders.
//! 6. Net pay, and the year-to-date totals with this period added.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::ReferenceDataProvider;
use crate::error::EngineResult;
use crate::models::{
    EarningsBasis, EmployeeDetails, EmployeePayRunInputEntry, EmployeePayrollHistoryYtd, Money,
    PayDate, PensionTaxTreatment,
};

use super::collaborators::ni_reinvestment;
use super::{
    Deduction, EmployeePayRunResult, NiCalculationResult, NiCalculator, PayPeriodFigures,
    PayRunCalculators, PensionContributionCalculator,
};

type PensionCalculatorCache =
    HashMap<(EarningsBasis, PensionTaxTreatment), Arc<dyn PensionContributionCalculator>>;

/// Calculates pay runs for every employee paid on one pay date.
///
/// The processor holds an [`NiCalculator`] for the pay date and caches pension
/// calculators per earnings basis and tax treatment, so it should be created
/// once per pay run and shared across employees. It is `Send + Sync`;
/// entries for different employees may be processed in parallel.
pub struct PayRunEntryProcessor {
    pay_date: PayDate,
    ni_calculator: NiCalculator,
    calculators: PayRunCalculators,
    pension_calculators: RwLock<PensionCalculatorCache>,
}

/// Pay figures after aggregation, plus the deductions taken from net pay.
struct AggregatedPay {
    figures: PayPeriodFigures,
    other_deductions: Money,
}

impl PayRunEntryProcessor {
    /// Creates a processor for one pay date.
    ///
    /// Resolves the NI reference data up front; fails if none is loaded for the date.
    pub fn new(
        reference_data: &dyn ReferenceDataProvider,
        pay_date: PayDate,
        calculators: PayRunCalculators,
    ) -> EngineResult<Self> {
        let ni_calculator = NiCalculator::for_pay_date(reference_data, pay_date, 1)?;

        Ok(Self {
            pay_date,
            ni_calculator,
            calculators,
            pension_calculators: RwLock::new(HashMap::new()),
        })
    }

    /// The pay date this processor calculates for.
    pub fn pay_date(&self) -> PayDate {
        self.pay_date
    }

    /// Calculates one employee's pay for the period.
    ///
    /// Any error aborts this entry only; the processor can carry on with
    /// other employees.
    pub fn process(&self, entry: &EmployeePayRunInputEntry) -> EngineResult<EmployeePayRunResult> {
        let started = Instant::now();
        let employee_id = entry.employee.employee_id.as_str();

        let result = self.process_entry(entry);

        match &result {
            Ok(result) => info!(
                employee_id = %employee_id,
                gross_pay = %result.figures.gross_pay,
                net_pay = %result.net_pay,
                duration_us = started.elapsed().as_micros() as u64,
                "Pay run entry processed"
            ),
            Err(e) => warn!(employee_id = %employee_id, error = %e, "Pay run entry failed"),
        }

        result
    }

    fn process_entry(
        &self,
        entry: &EmployeePayRunInputEntry,
    ) -> EngineResult<EmployeePayRunResult> {
        let employee = &entry.employee;
        let ytd = &entry.ytd;

        employee.tax_code.validate_for(self.pay_date.tax_year())?;

        let AggregatedPay {
            mut figures,
            other_deductions,
        } = self.aggregate(entry);

        let baseline_ni = self.calculate_ni(employee, figures.nicable_pay, ytd)?;
        debug!(
            employee_id = %employee.employee_id,
            nicable_pay = %figures.nicable_pay,
            employee_ni = %baseline_ni.employee_contribution,
            employer_ni = %baseline_ni.employer_contribution,
            "Baseline NI calculated"
        );

        let (mut ni_result, pension_result, employer_ni_saving) = match &employee.pension {
            None => (baseline_ni, None, Decimal::ZERO),
            Some(pension) => {
                let calculator =
                    self.pension_calculator(pension.earnings_basis, pension.tax_treatment)?;
                let levels = &pension.contribution_levels;

                if levels.salary_exchange_applied {
                    let exchanged = calculator.salary_exchanged_amount(levels, &figures)?;
                    figures.nicable_pay -= exchanged;
                    figures.working_gross_pay -= exchanged;
                    figures.taxable_pay -= exchanged;

                    let ni_after_exchange =
                        self.calculate_ni(employee, figures.nicable_pay, ytd)?;
                    let saving = baseline_ni.employer_contribution
                        - ni_after_exchange.employer_contribution;
                    let reinvestment =
                        ni_reinvestment(saving, levels.employers_ni_reinvestment_percentage);

                    debug!(
                        employee_id = %employee.employee_id,
                        salary_exchanged = %exchanged,
                        employer_ni_saving = %saving,
                        reinvestment = %reinvestment,
                        "Salary exchange applied"
                    );

                    let pension_result = calculator.calculate_under_salary_exchange(
                        levels,
                        &figures,
                        exchanged,
                        reinvestment,
                    )?;
                    (ni_after_exchange, Some(pension_result), saving)
                } else {
                    let pension_result = calculator.calculate(levels, &figures)?;
                    if pension.tax_treatment == PensionTaxTreatment::NetPayArrangement {
                        figures.working_gross_pay -= pension_result.employee_contribution;
                        figures.taxable_pay -= pension_result.employee_contribution;
                    }
                    (baseline_ni, Some(pension_result), Decimal::ZERO)
                }
            }
        };

        if let Some(pension) = &pension_result {
            debug!(
                employee_id = %employee.employee_id,
                employee_contribution = %pension.employee_contribution,
                employer_contribution = %pension.employer_contribution,
                "Pension contributions calculated"
            );
        }

        if !figures.payrolled_benefits.is_zero() {
            ni_result.class1a_contribution =
                Some(self.ni_calculator.calculate_class1a(figures.payrolled_benefits)?);
        }

        let tax_result = self.calculators.tax.calculate(&employee.tax_code, &figures, ytd)?;
        debug!(
            employee_id = %employee.employee_id,
            taxable_pay = %figures.taxable_pay,
            tax_due = %tax_result.tax_due,
            "Income tax calculated"
        );

        let student_loan_result = employee
            .student_loan
            .as_ref()
            .map(|loans| self.calculators.student_loans.calculate(loans, &figures, ytd))
            .transpose()?;

        let attachment_order_result = if employee.attachment_orders.is_empty() {
            None
        } else {
            Some(self.calculators.attachment_orders.calculate(
                &employee.attachment_orders,
                &figures,
                ytd,
            )?)
        };

        let net_pay = figures.gross_pay
            - tax_result.total_deduction()
            - ni_result.employee_contribution
            - total_deduction(pension_result.as_ref())
            - total_deduction(student_loan_result.as_ref())
            - total_deduction(attachment_order_result.as_ref())
            - other_deductions;

        let result = EmployeePayRunResult {
            employee_id: employee.employee_id.clone(),
            figures,
            ni_result,
            employer_ni_saving,
            pension_result,
            tax_result,
            student_loan_result,
            attachment_order_result,
            statutory_payments: entry.statutory_payments,
            other_deductions,
            net_pay,
            updated_ytd: EmployeePayrollHistoryYtd::default(),
        };

        Ok(EmployeePayRunResult {
            updated_ytd: ytd.apply(&result),
            ..result
        })
    }

    /// Sums earnings and deductions into the period's pay figures.
    fn aggregate(&self, entry: &EmployeePayRunInputEntry) -> AggregatedPay {
        let statutory = entry.statutory_payments.total();

        let mut figures = PayPeriodFigures {
            pay_date: self.pay_date,
            gross_pay: statutory,
            working_gross_pay: Decimal::ZERO,
            taxable_pay: statutory + entry.payrolled_benefits,
            nicable_pay: statutory,
            pensionable_pay: statutory,
            payrolled_benefits: entry.payrolled_benefits,
        };
        let mut other_deductions = Decimal::ZERO;

        for item in &entry.earnings {
            figures.gross_pay += item.amount;
            if item.is_taxable {
                figures.taxable_pay += item.amount;
            }
            if item.is_nicable {
                figures.nicable_pay += item.amount;
            }
            if item.is_pensionable {
                figures.pensionable_pay += item.amount;
            }
        }

        for item in &entry.deductions {
            if item.reduces_gross {
                figures.gross_pay -= item.amount;
            } else {
                other_deductions += item.amount;
            }
            if item.reduces_taxable {
                figures.taxable_pay -= item.amount;
            }
            if item.reduces_nicable {
                figures.nicable_pay -= item.amount;
            }
            if item.reduces_pensionable {
                figures.pensionable_pay -= item.amount;
            }
        }

        figures.working_gross_pay = figures.gross_pay;

        AggregatedPay {
            figures,
            other_deductions,
        }
    }

    /// NI on `nicable_pay`, using the directors' method where the employee is a director.
    fn calculate_ni(
        &self,
        employee: &EmployeeDetails,
        nicable_pay: Money,
        ytd: &EmployeePayrollHistoryYtd,
    ) -> EngineResult<NiCalculationResult> {
        match &employee.director {
            None => self.ni_calculator.calculate(employee.ni_category, nicable_pay),
            Some(director) => {
                let history = &ytd.ni_history;
                self.ni_calculator.calculate_directors(
                    director.method,
                    employee.ni_category,
                    nicable_pay,
                    history.total_nicable_pay(),
                    history.total_employee_contribution(),
                    history.total_employer_contribution(),
                    director.pro_rata_factor,
                    Some(&history.total_earnings_breakdown()),
                )
            }
        }
    }

    /// The cached pension calculator for a basis and treatment, created on first use.
    fn pension_calculator(
        &self,
        earnings_basis: EarningsBasis,
        tax_treatment: PensionTaxTreatment,
    ) -> EngineResult<Arc<dyn PensionContributionCalculator>> {
        let key = (earnings_basis, tax_treatment);

        if let Some(calculator) = self.pension_calculators.read().get(&key) {
            return Ok(Arc::clone(calculator));
        }

        let mut cache = self.pension_calculators.write();
        if let Some(calculator) = cache.get(&key) {
            return Ok(Arc::clone(calculator));
        }

        debug!(?earnings_basis, ?tax_treatment, "Creating pension calculator");
        let calculator =
            self.calculators
                .pensions
                .get_calculator(earnings_basis, tax_treatment, self.pay_date)?;
        cache.insert(key, Arc::clone(&calculator));

        Ok(calculator)
    }
}

fn total_deduction<T: Deduction>(result: Option<&T>) -> Money {
    result.map(Deduction::total_deduction).unwrap_or_default()
}
