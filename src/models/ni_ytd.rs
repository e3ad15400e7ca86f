//! Year-to-date NI history.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{NiCalculationResult, NiEarningsBreakdown};

use super::{Money, NiCategory};

/// Year-to-date NI figures for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NiYtdHistoryEntry {
    /// The NI category.
    pub ni_category: NiCategory,
    /// Nicable pay under this category so far this year.
    pub gross_earnings_for_nics: Money,
    /// Accumulated earnings breakdown.
    pub earnings_breakdown: NiEarningsBreakdown,
    /// Employee NI paid so far.
    pub employee_contribution: Money,
    /// Employer NI paid so far.
    pub employer_contribution: Money,
    /// Employee plus employer NI.
    pub total_contribution: Money,
}

impl NiYtdHistoryEntry {
    fn empty(ni_category: NiCategory) -> Self {
        Self {
            ni_category,
            gross_earnings_for_nics: Decimal::ZERO,
            earnings_breakdown: NiEarningsBreakdown::default(),
            employee_contribution: Decimal::ZERO,
            employer_contribution: Decimal::ZERO,
            total_contribution: Decimal::ZERO,
        }
    }

    fn add(&self, result: &NiCalculationResult) -> Self {
        Self {
            ni_category: self.ni_category,
            gross_earnings_for_nics: self.gross_earnings_for_nics + result.nicable_pay,
            earnings_breakdown: self.earnings_breakdown.add(&result.earnings_breakdown),
            employee_contribution: self.employee_contribution + result.employee_contribution,
            employer_contribution: self.employer_contribution + result.employer_contribution,
            total_contribution: self.total_contribution + result.total_contribution,
        }
    }
}

/// An employee's NI history for the tax year, one entry per category held.
///
/// Values are immutable: [`NiYtdHistory::add`] returns a new history.
///
/// # Example
///
/// ```
/// use payroll_ni_engine::models::NiYtdHistory;
///
/// let history = NiYtdHistory::default();
/// assert!(history.entries().is_empty());
/// assert!(history.total_employee_contribution().is_zero());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NiYtdHistory {
    entries: Vec<NiYtdHistoryEntry>,
}

impl NiYtdHistory {
    /// Builds a history from existing entries, e.g. when taking over a payroll mid-year.
    pub fn from_entries(mut entries: Vec<NiYtdHistoryEntry>) -> Self {
        entries.sort_by_key(|e| e.ni_category);
        Self { entries }
    }

    /// Entries in category order.
    pub fn entries(&self) -> &[NiYtdHistoryEntry] {
        &self.entries
    }

    /// The entry for a category, if the employee has held it this year.
    pub fn entry(&self, category: NiCategory) -> Option<&NiYtdHistoryEntry> {
        self.entries.iter().find(|e| e.ni_category == category)
    }

    /// Returns a new history with `result` added to its category's entry.
    pub fn add(&self, result: &NiCalculationResult) -> Self {
        let mut entries = self.entries.clone();

        match entries
            .iter_mut()
            .find(|e| e.ni_category == result.ni_category)
        {
            Some(entry) => *entry = entry.add(result),
            None => entries.push(NiYtdHistoryEntry::empty(result.ni_category).add(result)),
        }

        Self::from_entries(entries)
    }

    /// Nicable pay across all categories.
    pub fn total_nicable_pay(&self) -> Money {
        self.entries.iter().map(|e| e.gross_earnings_for_nics).sum()
    }

    /// Employee NI across all categories.
    pub fn total_employee_contribution(&self) -> Money {
        self.entries.iter().map(|e| e.employee_contribution).sum()
    }

    /// Employer NI across all categories.
    pub fn total_employer_contribution(&self) -> Money {
        self.entries.iter().map(|e| e.employer_contribution).sum()
    }

    /// Earnings breakdown across all categories.
    pub fn total_earnings_breakdown(&self) -> NiEarningsBreakdown {
        self.entries
            .iter()
            .fold(NiEarningsBreakdown::default(), |total, e| {
                total.add(&e.earnings_breakdown)
            })
    }
}
