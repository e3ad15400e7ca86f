//! UK tax years, pay frequencies and pay dates.
//!
//! A UK tax year runs from 6 April to the following 5 April. Pay periods
//! within the year are numbered from 1 according to the pay frequency.

use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Day-of-year offset (zero based) of 6 April in a non-leap year.
const APRIL_6_ORDINAL0: i64 = 95;

/// A UK tax year, identified by the calendar year in which it starts.
///
/// # Example
///
/// ```
/// use payroll_ni_engine::models::TaxYear;
/// use chrono::NaiveDate;
///
/// let year = TaxYear::from_date(NaiveDate::from_ymd_opt(2023, 4, 5).unwrap());
/// assert_eq!(year, TaxYear::starting(2022));
/// assert_eq!(year.to_string(), "2022-23");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxYear(i32);

impl TaxYear {
    /// Creates the tax year starting on 6 April of `year`.
    pub const fn starting(year: i32) -> Self {
        TaxYear(year)
    }

    /// Returns the tax year containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        if (date.month(), date.day()) >= (4, 6) {
            TaxYear(date.year())
        } else {
            TaxYear(date.year() - 1)
        }
    }

    /// The calendar year in which this tax year starts.
    pub fn starting_year(self) -> i32 {
        self.0
    }

    /// The calendar year in which this tax year ends.
    pub fn ending_year(self) -> i32 {
        self.0 + 1
    }

    /// Zero-based day index of `date` within this tax year.
    ///
    /// Only meaningful when `date` falls within the year.
    fn day_index(self, date: NaiveDate) -> i64 {
        let ordinal0 = i64::from(date.ordinal0());
        if date.year() == self.0 {
            ordinal0 - april_6_ordinal0(self.0)
        } else {
            ordinal0 + days_in_year(self.0) - april_6_ordinal0(self.0)
        }
    }
}

impl fmt::Display for TaxYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.0, self.ending_year().rem_euclid(100))
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_year(year: i32) -> i64 {
    if is_leap_year(year) { 366 } else { 365 }
}

fn april_6_ordinal0(year: i32) -> i64 {
    if is_leap_year(year) {
        APRIL_6_ORDINAL0 + 1
    } else {
        APRIL_6_ORDINAL0
    }
}

/// How often an employee is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayFrequency {
    /// Paid every week.
    Weekly,
    /// Paid every two weeks.
    Fortnightly,
    /// Paid every four weeks.
    FourWeekly,
    /// Paid every calendar month.
    Monthly,
    /// Paid every three months.
    Quarterly,
    /// Paid twice a year.
    BiAnnually,
    /// Paid once a year.
    Annually,
}

impl PayFrequency {
    /// The standard number of pay periods of this frequency in a tax year.
    ///
    /// Weekly pay can occasionally run to a 53rd period; the standard count
    /// is still 52 and is what threshold division uses.
    pub fn standard_periods(self) -> u32 {
        match self {
            PayFrequency::Weekly => 52,
            PayFrequency::Fortnightly => 26,
            PayFrequency::FourWeekly => 13,
            PayFrequency::Monthly => 12,
            PayFrequency::Quarterly => 4,
            PayFrequency::BiAnnually => 2,
            PayFrequency::Annually => 1,
        }
    }

    fn days_per_period(self) -> Option<u64> {
        match self {
            PayFrequency::Weekly => Some(7),
            PayFrequency::Fortnightly => Some(14),
            PayFrequency::FourWeekly => Some(28),
            _ => None,
        }
    }

    fn months_per_period(self) -> u32 {
        match self {
            PayFrequency::Monthly => 1,
            PayFrequency::Quarterly => 3,
            PayFrequency::BiAnnually => 6,
            _ => 12,
        }
    }
}

/// A payment date together with the frequency of the payroll it belongs to.
///
/// # Example
///
/// ```
/// use payroll_ni_engine::models::{PayDate, PayFrequency};
/// use chrono::NaiveDate;
///
/// let pay_date = PayDate::new(NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(), PayFrequency::Monthly);
/// assert_eq!(pay_date.tax_period(), 1);
/// assert!(!pay_date.is_final_period());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayDate {
    /// The date on which payment is made.
    pub date: NaiveDate,
    /// The frequency of the payroll.
    pub frequency: PayFrequency,
}

impl PayDate {
    /// Creates a new pay date.
    pub fn new(date: NaiveDate, frequency: PayFrequency) -> Self {
        Self { date, frequency }
    }

    /// The tax year in which the payment falls.
    pub fn tax_year(&self) -> TaxYear {
        TaxYear::from_date(self.date)
    }

    /// The one-based tax period number of the payment.
    pub fn tax_period(&self) -> u32 {
        match self.frequency.days_per_period() {
            Some(days) => {
                let index = self.tax_year().day_index(self.date).max(0) as u64;
                (index / days) as u32 + 1
            }
            None => {
                let months_into_year = self.months_into_tax_year();
                months_into_year / self.frequency.months_per_period() + 1
            }
        }
    }

    /// Returns true if the next payment at this frequency falls in the next tax year.
    pub fn is_final_period(&self) -> bool {
        let next = match self.frequency.days_per_period() {
            Some(days) => self.date.checked_add_days(Days::new(days)),
            None => self
                .date
                .checked_add_months(Months::new(self.frequency.months_per_period())),
        };

        next.is_none_or(|next| TaxYear::from_date(next) != self.tax_year())
    }

    /// Whole tax months elapsed since 6 April (tax month 1 runs 6 April to 5 May).
    fn months_into_tax_year(&self) -> u32 {
        let month0 = self.date.month0() as i32;
        let mut months = (month0 - 3).rem_euclid(12);
        if self.date.day() < 6 {
            months = (months - 1).rem_euclid(12);
        }
        months as u32
    }
}
