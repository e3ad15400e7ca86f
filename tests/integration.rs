//! Integration tests for the payroll NI engine.
//!
//! This test suite runs against the reference data shipped in `config/uk`:
//! - Loading the NI reference data for each tax year
//! - Employee and director NI calculations
//! - A full tax year of pay runs with carried year-to-date figures
//! - The HTTP endpoints

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;

use payroll_ni_engine::api::{AppState, create_router};
use payroll_ni_engine::calculation::{
    AttachmentOrderCalculationResult, AttachmentOrderCalculator, EmployeePayRunResult,
    NiCalculationResult, NiCalculator, PayPeriodFigures, PayRunCalculators, PayRunEntryProcessor, PensionCalculatorFactory,
    PensionContributionCalculator, StudentLoanCalculationResult, StudentLoanCalculator,
    TaxCalculationResult, TaxCalculator,
};
use payroll_ni_engine::config::{ConfigLoader, ReferenceDataProvider};
use payroll_ni_engine::error::{EngineError, EngineResult};
use payroll_ni_engine::models::{
    AttachmentOrder, DirectorDetails, DirectorsNiMethod, EarningsBasis, EarningsItem,
    EmployeeDetails, EmployeePayRunInputEntry, EmployeePayrollHistoryYtd, MoneyRounding,
    NiCategory, NiThresholdType, PayDate, PayFrequency, PensionTaxTreatment, StatutoryPayments,
    StudentLoanInfo, TaxCode, TaxYear,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn load_config() -> ConfigLoader {
    ConfigLoader::load("./config/uk").expect("Failed to load config")
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn money(value: &Value) -> Decimal {
    decimal(value.as_str().expect("Expected a decimal string"))
}

/// The last day of each month from April to March in the tax year starting in `year`.
fn month_end_pay_dates(year: i32) -> Vec<NaiveDate> {
    (0..12)
        .map(|offset| {
            let (y, m) = if offset < 9 {
                (year, 4 + offset)
            } else {
                (year + 1, offset - 8)
            };
            let first_of_next = if m == 12 {
                NaiveDate::from_ymd_opt(y + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(y, m as u32 + 1, 1)
            };
            first_of_next.unwrap().pred_opt().unwrap()
        })
        .collect()
}

/// 20% of taxable pay.
struct BasicRateTax;

impl TaxCalculator for BasicRateTax {
    fn calculate(
        &self,
        _tax_code: &TaxCode,
        figures: &PayPeriodFigures,
        _ytd: &EmployeePayrollHistoryYtd,
    ) -> EngineResult<TaxCalculationResult> {
        Ok(TaxCalculationResult {
            tax_due: (figures.taxable_pay * decimal("0.2")).round_half_up(2),
            tax_unpaid_due_to_regulatory_limit: Decimal::ZERO,
        })
    }
}

/// Calculators for employees with no loans, pensions or orders.
struct NotUsed;

impl StudentLoanCalculator for NotUsed {
    fn calculate(
        &self,
        _loans: &StudentLoanInfo,
        _figures: &PayPeriodFigures,
        _ytd: &EmployeePayrollHistoryYtd,
    ) -> EngineResult<StudentLoanCalculationResult> {
        panic!("Expected no student loan calculation")
    }
}

impl PensionCalculatorFactory for NotUsed {
    fn get_calculator(
        &self,
        _earnings_basis: EarningsBasis,
        _tax_treatment: PensionTaxTreatment,
        _pay_date: PayDate,
    ) -> EngineResult<Arc<dyn PensionContributionCalculator>> {
        panic!("Expected no pension calculation")
    }
}

impl AttachmentOrderCalculator for NotUsed {
    fn calculate(
        &self,
        _orders: &[AttachmentOrder],
        _figures: &PayPeriodFigures,
        _ytd: &EmployeePayrollHistoryYtd,
    ) -> EngineResult<AttachmentOrderCalculationResult> {
        panic!("Expected no attachment order calculation")
    }
}

fn calculators() -> PayRunCalculators {
    PayRunCalculators {
        tax: Arc::new(BasicRateTax),
        student_loans: Arc::new(NotUsed),
        pensions: Arc::new(NotUsed),
        attachment_orders: Arc::new(NotUsed),
    }
}

fn employee(id: &str, director: Option<DirectorDetails>) -> EmployeeDetails {
    EmployeeDetails {
        employee_id: id.to_string(),
        ni_category: NiCategory::A,
        tax_code: "1257L".parse().unwrap(),
        director,
        pension: None,
        student_loan: None,
        attachment_orders: Vec::new(),
    }
}

/// Runs a monthly salary through every period of the 2024-25 tax year.
fn run_tax_year(employee: EmployeeDetails, salary: &str) -> EmployeePayrollHistoryYtd {
    let results = run_pay_runs(employee, &[salary; 12]);
    results.last().unwrap().updated_ytd.clone()
}

/// Runs one pay run per month of 2024-25, carrying the year-to-date figures forward.
fn run_pay_runs(employee: EmployeeDetails, salaries: &[&str; 12]) -> Vec<EmployeePayRunResult> {
    let config = load_config();
    let mut ytd = EmployeePayrollHistoryYtd::default();
    let mut results = Vec::with_capacity(12);

    for (pay_date, salary) in month_end_pay_dates(2024).into_iter().zip(salaries) {
        let processor = PayRunEntryProcessor::new(
            &config,
            PayDate::new(pay_date, PayFrequency::Monthly),
            calculators(),
        )
        .unwrap();

        let entry = EmployeePayRunInputEntry {
            employee: employee.clone(),
            earnings: vec![EarningsItem::new("Salary", decimal(salary))],
            deductions: Vec::new(),
            statutory_payments: StatutoryPayments::default(),
            payrolled_benefits: Decimal::ZERO,
            ytd: ytd.clone(),
        };

        let result = processor.process(&entry).unwrap();
        ytd = result.updated_ytd.clone();
        results.push(result);
    }

    results
}

/// The annual directors' NI on `total` nicable pay in 2024-25.
fn annual_director_ni(total: &str) -> NiCalculationResult {
    let config = load_config();
    let pay_date = PayDate::new(date("2025-03-31"), PayFrequency::Monthly);
    NiCalculator::for_pay_date(&config, pay_date, 1)
        .unwrap()
        .calculate_directors(
            DirectorsNiMethod::Standard,
            NiCategory::A,
            decimal(total),
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
            None,
            None,
        )
        .unwrap()
}

fn alternative_director() -> Option<DirectorDetails> {
    Some(DirectorDetails {
        method: DirectorsNiMethod::Alternative,
        pro_rata_factor: None,
    })
}

async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

// =============================================================================
// Reference Data
// =============================================================================

#[test]
fn test_loads_all_shipped_tax_years() {
    let config = load_config();
    assert_eq!(
        config.tax_years(),
        vec![TaxYear::starting(2022), TaxYear::starting(2023), TaxYear::starting(2024)]
    );
}

#[test]
fn test_primary_threshold_changes_mid_year_2022() {
    let config = load_config();

    let before = config.ni_thresholds(date("2022-07-05")).unwrap();
    let after = config.ni_thresholds(date("2022-07-06")).unwrap();

    assert_eq!(before.get_threshold(NiThresholdType::Pt), Some(decimal("9880")));
    assert_eq!(after.get_threshold(NiThresholdType::Pt), Some(decimal("12570")));
}

#[test]
fn test_date_before_loaded_years_is_not_found() {
    let config = load_config();
    match config.ni_thresholds(date("2021-04-06")) {
        Err(EngineError::ReferenceDataNotFound { date: missing, .. }) => {
            assert_eq!(missing, date("2021-04-06"));
        }
        other => panic!("Expected ReferenceDataNotFound, got {:?}", other),
    }
}

// =============================================================================
// NI Calculations
// =============================================================================

#[test]
fn test_director_standard_method_just_above_secondary_threshold() {
    let config = load_config();
    let pay_date = PayDate::new(date("2022-04-30"), PayFrequency::Monthly);
    let calculator = NiCalculator::for_pay_date(&config, pay_date, 1).unwrap();

    let result = calculator
        .calculate_directors(
            DirectorsNiMethod::Standard,
            NiCategory::A,
            decimal("9101"),
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
            None,
            None,
        )
        .unwrap();

    assert_eq!(result.employer_contribution, decimal("0.14"));
    assert_eq!(result.employee_contribution, decimal("0.00"));
}

#[test]
fn test_weekly_pay_below_lower_earnings_limit() {
    let config = load_config();
    let pay_date = PayDate::new(date("2022-11-09"), PayFrequency::Weekly);
    assert_eq!(pay_date.tax_period(), 32);

    let calculator = NiCalculator::for_pay_date(&config, pay_date, 1).unwrap();
    let result = calculator.calculate(NiCategory::A, decimal("15.50")).unwrap();

    assert_eq!(result.employee_contribution, Decimal::ZERO);
    assert_eq!(result.employer_contribution, Decimal::ZERO);
    assert_eq!(result.earnings_breakdown.earnings_up_to_and_including_lel, Decimal::ZERO);
    assert_eq!(result.nicable_pay, decimal("15.50"));
    assert!(result.no_recording_required);
}

#[test]
fn test_rates_follow_pay_date_within_2022_tax_year() {
    let config = load_config();
    let before = NiCalculator::for_pay_date(
        &config,
        PayDate::new(date("2022-10-31"), PayFrequency::Monthly),
        1,
    )
    .unwrap()
    .calculate(NiCategory::A, decimal("3000"))
    .unwrap();
    let after = NiCalculator::for_pay_date(
        &config,
        PayDate::new(date("2022-11-30"), PayFrequency::Monthly),
        1,
    )
    .unwrap()
    .calculate(NiCategory::A, decimal("3000"))
    .unwrap();

    assert_eq!(before.rates_used.employee_rate_pt_to_uel, decimal("0.1325"));
    assert_eq!(after.rates_used.employee_rate_pt_to_uel, decimal("0.12"));
    assert!(after.employee_contribution < before.employee_contribution);
}

// =============================================================================
// Pay Runs
// =============================================================================

#[test]
fn test_employee_full_year_totals() {
    let ytd = run_tax_year(employee("E100", None), "3000");

    assert_eq!(ytd.gross_pay, decimal("36000"));
    assert_eq!(ytd.nicable_pay, decimal("36000"));
    assert_eq!(ytd.tax_paid, decimal("7200.00"));
    // 12 x 156.16 and 12 x 309.40
    assert_eq!(ytd.ni_history.total_employee_contribution(), decimal("1873.92"));
    assert_eq!(ytd.ni_history.total_employer_contribution(), decimal("3712.80"));
}

#[test]
fn test_director_full_year_matches_annual_liability() {
    let director = DirectorDetails {
        method: DirectorsNiMethod::Standard,
        pro_rata_factor: None,
    };
    let ytd = run_tax_year(employee("D100", Some(director)), "3000");

    // 23430 x 8% above the annual primary threshold
    assert_eq!(ytd.ni_history.total_employee_contribution(), decimal("1874.40"));
    // 26900 x 13.8% above the annual secondary threshold
    assert_eq!(ytd.ni_history.total_employer_contribution(), decimal("3712.20"));
    assert_eq!(ytd.ni_history.total_nicable_pay(), decimal("36000"));
}

#[test]
fn test_alternative_director_regular_pay_trues_up_to_annual() {
    let results = run_pay_runs(employee("D200", alternative_director()), &["4000"; 12]);
    let ytd = &results[11].updated_ytd;
    let annual = annual_director_ni("48000");

    // Periods 1 to 11 are calculated like an employee's.
    assert_eq!(results[0].ni_result.employee_contribution, decimal("236.16"));
    assert_eq!(ytd.ni_history.total_employee_contribution(), decimal("2834.40"));
    assert_eq!(ytd.ni_history.total_employer_contribution(), decimal("5368.20"));
    assert_eq!(ytd.ni_history.total_earnings_breakdown(), annual.earnings_breakdown);
}

#[test]
fn test_alternative_director_irregular_pay_refunds_employer_overpayment() {
    let mut salaries = ["0"; 12];
    salaries[0] = "20000";
    salaries[11] = "1000";

    let results = run_pay_runs(employee("D300", alternative_director()), &salaries);
    let final_period = &results[11];
    let ytd = &final_period.updated_ytd;
    let annual = annual_director_ni("21000");

    // April on monthly thresholds: employee 567.50, employer 2655.40.
    assert_eq!(results[0].ni_result.employee_contribution, decimal("567.50"));
    assert_eq!(results[0].ni_result.employer_contribution, decimal("2655.40"));
    assert!(results[1].ni_result.no_recording_required);

    // Annual: 8430 x 8% = 674.40 and 11900 x 13.8% = 1642.20
    assert_eq!(final_period.ni_result.employee_contribution, decimal("106.90"));
    assert_eq!(final_period.ni_result.employer_contribution, decimal("-1013.20"));
    assert!(!final_period.ni_result.no_recording_required);

    assert_eq!(ytd.ni_history.total_employee_contribution(), annual.employee_contribution);
    assert_eq!(ytd.ni_history.total_employer_contribution(), annual.employer_contribution);
    assert_eq!(ytd.ni_history.total_earnings_breakdown(), annual.earnings_breakdown);
    assert_eq!(ytd.nicable_pay, decimal("21000"));
}

#[test]
fn test_alternative_director_refund_below_annual_lel() {
    let mut salaries = ["0"; 12];
    salaries[0] = "6000";

    let results = run_pay_runs(employee("D400", alternative_director()), &salaries);
    let final_period = &results[11].ni_result;

    assert_eq!(final_period.employee_contribution, decimal("-287.50"));
    assert_eq!(final_period.employer_contribution, decimal("-723.40"));
    assert!(!final_period.no_recording_required);

    let history = &results[11].updated_ytd.ni_history;
    assert!(history.total_employee_contribution().is_zero());
    assert!(history.total_employer_contribution().is_zero());
}

#[test]
fn test_month_end_pay_dates_cover_every_period() {
    let periods: Vec<u32> = month_end_pay_dates(2024)
        .into_iter()
        .map(|d| PayDate::new(d, PayFrequency::Monthly).tax_period())
        .collect();
    assert_eq!(periods, (1..=12).collect::<Vec<_>>());
    assert_eq!(month_end_pay_dates(2024)[10].day(), 28);
}

// =============================================================================
// HTTP API
// =============================================================================

#[tokio::test]
async fn test_api_calculate_category_a() {
    let router = create_router(AppState::new(load_config()));
    let body = json!({
        "pay_date": "2024-05-31",
        "frequency": "monthly",
        "ni_category": "A",
        "nicable_pay": "5000"
    });

    let (status, result) = post_json(router, "/ni/calculate", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(money(&result["employee_contribution"]), decimal("267.50"));
    assert_eq!(money(&result["employer_contribution"]), decimal("585.40"));
    assert_eq!(money(&result["earnings_breakdown"]["earnings_above_uel"]), decimal("811"));
}

#[tokio::test]
async fn test_api_directors_invalid_pro_rata_factor() {
    let router = create_router(AppState::new(load_config()));
    let body = json!({
        "pay_date": "2024-05-31",
        "frequency": "monthly",
        "method": "standard",
        "ni_category": "A",
        "period_pay": "3000",
        "pro_rata_factor": "1.5"
    });

    let (status, result) = post_json(router, "/ni/directors", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "VALIDATION_ERROR");
}
