//! Input to a pay run for one employee.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{DirectorsNiMethod, EmployeePayrollHistoryYtd, Money, NiCategory, TaxYear};

/// Everything needed to calculate one employee's pay for one period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeePayRunInputEntry {
    /// The employee and their standing payroll details.
    pub employee: EmployeeDetails,
    /// Itemised earnings for the period.
    #[serde(default)]
    pub earnings: Vec<EarningsItem>,
    /// Itemised deductions for the period.
    #[serde(default)]
    pub deductions: Vec<DeductionItem>,
    /// Statutory payments for the period.
    #[serde(default)]
    pub statutory_payments: StatutoryPayments,
    /// Benefits in kind taxed through the payroll.
    #[serde(default)]
    pub payrolled_benefits: Money,
    /// Year-to-date figures before this period.
    #[serde(default)]
    pub ytd: EmployeePayrollHistoryYtd,
}

/// Standing details of an employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeDetails {
    /// Payroll identifier.
    pub employee_id: String,
    /// NI category letter.
    pub ni_category: NiCategory,
    /// Current tax code.
    pub tax_code: TaxCode,
    /// Present if the employee is a company director.
    #[serde(default)]
    pub director: Option<DirectorDetails>,
    /// Present if the employee is in a workplace pension.
    #[serde(default)]
    pub pension: Option<PensionMembership>,
    /// Present if the employee repays a student or postgraduate loan.
    #[serde(default)]
    pub student_loan: Option<StudentLoanInfo>,
    /// Court or council orders to deduct from earnings.
    #[serde(default)]
    pub attachment_orders: Vec<AttachmentOrder>,
}

/// NI details for a company director.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorDetails {
    /// How the director's NI is calculated.
    pub method: DirectorsNiMethod,
    /// Fraction of the year remaining at appointment, for directors appointed mid-year.
    #[serde(default)]
    pub pro_rata_factor: Option<Decimal>,
}

/// One line of earnings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningsItem {
    /// Payslip description.
    pub description: String,
    /// Amount for the period.
    pub amount: Money,
    /// Subject to income tax.
    pub is_taxable: bool,
    /// Subject to NI.
    pub is_nicable: bool,
    /// Counts towards pensionable pay.
    pub is_pensionable: bool,
}

impl EarningsItem {
    /// Earnings that are taxable, nicable and pensionable, such as basic salary.
    pub fn new(description: impl Into<String>, amount: Money) -> Self {
        Self {
            description: description.into(),
            amount,
            is_taxable: true,
            is_nicable: true,
            is_pensionable: true,
        }
    }
}

/// One line of deductions.
///
/// A deduction that does not reduce gross pay is taken from net pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionItem {
    /// Payslip description.
    pub description: String,
    /// Amount for the period.
    pub amount: Money,
    /// Deducted before gross pay.
    pub reduces_gross: bool,
    /// Reduces taxable pay.
    pub reduces_taxable: bool,
    /// Reduces nicable pay.
    pub reduces_nicable: bool,
    /// Reduces pensionable pay.
    pub reduces_pensionable: bool,
}

impl DeductionItem {
    /// A deduction taken from net pay.
    pub fn from_net_pay(description: impl Into<String>, amount: Money) -> Self {
        Self {
            description: description.into(),
            amount,
            reduces_gross: false,
            reduces_taxable: false,
            reduces_nicable: false,
            reduces_pensionable: false,
        }
    }
}

/// Statutory payments made in the period.
///
/// All are taxable, nicable and pensionable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatutoryPayments {
    /// Statutory Maternity Pay.
    pub maternity: Money,
    /// Statutory Paternity Pay.
    pub paternity: Money,
    /// Statutory Adoption Pay.
    pub adoption: Money,
    /// Statutory Shared Parental Pay.
    pub shared_parental: Money,
    /// Statutory Parental Bereavement Pay.
    pub parental_bereavement: Money,
    /// Statutory Sick Pay.
    pub sick: Money,
}

impl StatutoryPayments {
    /// Sum of all statutory payments.
    pub fn total(&self) -> Money {
        self.maternity
            + self.paternity
            + self.adoption
            + self.shared_parental
            + self.parental_bereavement
            + self.sick
    }

    /// Payment-by-payment sum.
    pub fn add(&self, other: &StatutoryPayments) -> StatutoryPayments {
        StatutoryPayments {
            maternity: self.maternity + other.maternity,
            paternity: self.paternity + other.paternity,
            adoption: self.adoption + other.adoption,
            shared_parental: self.shared_parental + other.shared_parental,
            parental_bereavement: self.parental_bereavement + other.parental_bereavement,
            sick: self.sick + other.sick,
        }
    }
}

/// Which pay a pension scheme calculates contributions on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EarningsBasis {
    /// Qualifying earnings between the auto-enrolment lower and upper limits.
    QualifyingEarnings,
    /// Basic pay only.
    PensionablePaySet1,
    /// Basic pay plus some variable pay.
    PensionablePaySet2,
    /// All pensionable pay.
    PensionablePaySet3,
}

/// How tax relief is given on employee pension contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PensionTaxTreatment {
    /// Contributions are deducted before tax.
    NetPayArrangement,
    /// Contributions are deducted after tax and the scheme claims basic rate relief.
    ReliefAtSource,
}

/// An employee's membership of a pension scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PensionMembership {
    /// Scheme name.
    pub scheme_name: String,
    /// Pay the scheme calculates on.
    pub earnings_basis: EarningsBasis,
    /// How tax relief is given.
    pub tax_treatment: PensionTaxTreatment,
    /// The agreed contribution levels.
    pub contribution_levels: PensionContributionLevels,
}

/// Contribution levels agreed for a pension member.
///
/// Percentages are expressed as percentages, so `5` is 5%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PensionContributionLevels {
    /// Employee contribution, as a percentage or a fixed amount.
    pub employee_contribution: Decimal,
    /// True if `employee_contribution` is a fixed amount.
    #[serde(default)]
    pub employee_contribution_is_fixed_amount: bool,
    /// Employer contribution, as a percentage or a fixed amount.
    pub employer_contribution: Decimal,
    /// True if `employer_contribution` is a fixed amount.
    #[serde(default)]
    pub employer_contribution_is_fixed_amount: bool,
    /// True if the employee contribution is made by salary exchange.
    #[serde(default)]
    pub salary_exchange_applied: bool,
    /// Percentage of the employer's NI saving paid into the pension under salary exchange.
    #[serde(default)]
    pub employers_ni_reinvestment_percentage: Option<Decimal>,
    /// Additional voluntary contribution for the period.
    #[serde(default)]
    pub avc_for_period: Option<Money>,
}

/// The income tax regime a tax code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    /// England and Northern Ireland.
    RestOfUk,
    /// Scottish rate of income tax, codes prefixed `S`.
    Scotland,
    /// Welsh rate of income tax, codes prefixed `C`.
    Wales,
}

impl TaxRegime {
    /// The first tax year the regime's codes are valid, if it has one.
    pub fn introduced_in(self) -> Option<TaxYear> {
        match self {
            TaxRegime::RestOfUk => None,
            TaxRegime::Scotland => Some(TaxYear::starting(2017)),
            TaxRegime::Wales => Some(TaxYear::starting(2019)),
        }
    }
}

/// A PAYE tax code such as `1257L`, `S1257L M1` or `CBR`.
///
/// # Example
///
/// ```
/// use payroll_ni_engine::models::{TaxCode, TaxRegime};
///
/// let code: TaxCode = "s1257l m1".parse().unwrap();
/// assert_eq!(code.regime(), TaxRegime::Scotland);
/// assert!(code.is_non_cumulative());
/// assert_eq!(code.to_string(), "S1257L M1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaxCode {
    code: String,
    regime: TaxRegime,
    non_cumulative: bool,
}

impl TaxCode {
    /// The regime indicated by the code's prefix.
    pub fn regime(&self) -> TaxRegime {
        self.regime
    }

    /// True for week 1 / month 1 (emergency) codes.
    pub fn is_non_cumulative(&self) -> bool {
        self.non_cumulative
    }

    /// Returns `DomainInconsistency` if the code's regime did not exist in `tax_year`.
    pub fn validate_for(&self, tax_year: TaxYear) -> EngineResult<()> {
        match self.regime.introduced_in() {
            Some(first) if tax_year < first => Err(EngineError::DomainInconsistency {
                message: format!(
                    "tax code {} is not valid in tax year {}; {:?} codes start in {}",
                    self.code, tax_year, self.regime, first
                ),
            }),
            _ => Ok(()),
        }
    }
}

impl FromStr for TaxCode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        let mut parts = code.split_whitespace();

        let body = parts
            .next()
            .ok_or_else(|| EngineError::invalid_argument("tax_code", "tax code is empty"))?;

        let non_cumulative = match parts.next() {
            None => false,
            Some("W1" | "M1" | "X") => true,
            Some(other) => {
                return Err(EngineError::invalid_argument(
                    "tax_code",
                    format!("unrecognised suffix '{}' in '{}'", other, s),
                ));
            }
        };

        if parts.next().is_some() || !body.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(EngineError::invalid_argument(
                "tax_code",
                format!("'{}' is not a valid tax code", s),
            ));
        }

        let regime = match body.split_at(1) {
            ("S", rest) if !rest.is_empty() => TaxRegime::Scotland,
            ("C", rest) if !rest.is_empty() => TaxRegime::Wales,
            _ => TaxRegime::RestOfUk,
        };

        Ok(TaxCode {
            code: code.split_whitespace().collect::<Vec<_>>().join(" "),
            regime,
            non_cumulative,
        })
    }
}

impl TryFrom<String> for TaxCode {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TaxCode> for String {
    fn from(code: TaxCode) -> Self {
        code.code
    }
}

impl fmt::Display for TaxCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// Student loan repayment plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentLoanPlan {
    /// Plan 1.
    Plan1,
    /// Plan 2.
    Plan2,
    /// Plan 4 (Scotland).
    Plan4,
    /// Plan 5.
    Plan5,
}

/// Student and postgraduate loan repayments an employee must make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentLoanInfo {
    /// Undergraduate plan, if any.
    #[serde(default)]
    pub plan: Option<StudentLoanPlan>,
    /// True if the employee also repays a postgraduate loan.
    #[serde(default)]
    pub has_postgraduate_loan: bool,
}

/// An attachment of earnings order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentOrder {
    /// Order reference.
    pub reference: String,
    /// Date the order was issued; orders are applied oldest first.
    pub issued_on: NaiveDate,
}
