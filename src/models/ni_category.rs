//! National Insurance category letters and directors' calculation methods.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

use super::TaxYear;

/// An NI category letter.
///
/// The set of letters is closed. Which letters may be used depends on the
/// tax year; see [`NiCategory::is_valid_for`].
///
/// # Example
///
/// ```
/// use payroll_ni_engine::models::{NiCategory, TaxYear};
///
/// let category: NiCategory = "N".parse().unwrap();
/// assert!(!category.is_valid_for(TaxYear::starting(2023)));
/// assert!(category.is_valid_for(TaxYear::starting(2024)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NiCategory {
    /// Standard rate.
    A,
    /// Married women and widows entitled to pay reduced NI.
    B,
    /// Over State Pension age.
    C,
    /// Investment zone, deferred NI.
    D,
    /// Investment zone, married women and widows' reduced rate.
    E,
    /// Freeport, standard rate.
    F,
    /// Apprentice under 25.
    H,
    /// Freeport, married women and widows' reduced rate.
    I,
    /// Deferred NI.
    J,
    /// Investment zone, over State Pension age.
    K,
    /// Freeport, deferred NI.
    L,
    /// Under 21.
    M,
    /// Investment zone, standard rate.
    N,
    /// Freeport, over State Pension age.
    S,
    /// Armed forces veteran in first civilian employment.
    V,
    /// Not liable to pay NI.
    X,
    /// Under 21, deferred NI.
    Z,
}

impl NiCategory {
    /// Every category letter, in alphabetical order.
    pub const ALL: [NiCategory; 17] = [
        NiCategory::A,
        NiCategory::B,
        NiCategory::C,
        NiCategory::D,
        NiCategory::E,
        NiCategory::F,
        NiCategory::H,
        NiCategory::I,
        NiCategory::J,
        NiCategory::K,
        NiCategory::L,
        NiCategory::M,
        NiCategory::N,
        NiCategory::S,
        NiCategory::V,
        NiCategory::X,
        NiCategory::Z,
    ];

    /// The category letter.
    pub fn letter(self) -> char {
        match self {
            NiCategory::A => 'A',
            NiCategory::B => 'B',
            NiCategory::C => 'C',
            NiCategory::D => 'D',
            NiCategory::E => 'E',
            NiCategory::F => 'F',
            NiCategory::H => 'H',
            NiCategory::I => 'I',
            NiCategory::J => 'J',
            NiCategory::K => 'K',
            NiCategory::L => 'L',
            NiCategory::M => 'M',
            NiCategory::N => 'N',
            NiCategory::S => 'S',
            NiCategory::V => 'V',
            NiCategory::X => 'X',
            NiCategory::Z => 'Z',
        }
    }

    /// The first tax year in which this category may be used.
    pub fn introduced_in(self) -> TaxYear {
        match self {
            NiCategory::D | NiCategory::E | NiCategory::K | NiCategory::N => TaxYear::starting(2024),
            NiCategory::F | NiCategory::I | NiCategory::L | NiCategory::S => TaxYear::starting(2022),
            NiCategory::V => TaxYear::starting(2021),
            NiCategory::H => TaxYear::starting(2016),
            NiCategory::M | NiCategory::Z => TaxYear::starting(2015),
            NiCategory::A | NiCategory::B | NiCategory::C | NiCategory::J | NiCategory::X => {
                TaxYear::starting(1975)
            }
        }
    }

    /// Returns true if the category may be used in `tax_year`.
    pub fn is_valid_for(self, tax_year: TaxYear) -> bool {
        tax_year >= self.introduced_in()
    }
}

impl fmt::Display for NiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for NiCategory {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        NiCategory::ALL
            .into_iter()
            .find(|c| trimmed.len() == 1 && trimmed.eq_ignore_ascii_case(&c.letter().to_string()))
            .ok_or_else(|| {
                EngineError::invalid_argument("ni_category", format!("unknown NI category '{}'", s))
            })
    }
}

/// How a company director's NI is calculated during the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectorsNiMethod {
    /// Annual earnings period: cumulative pay against annual thresholds every period.
    Standard,
    /// Treated like an employee each period, with an annual recalculation in the final period.
    Alternative,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category_letters() {
        assert_eq!("A".parse::<NiCategory>().unwrap(), NiCategory::A);
        assert_eq!("z".parse::<NiCategory>().unwrap(), NiCategory::Z);
        assert_eq!(" M ".parse::<NiCategory>().unwrap(), NiCategory::M);
    }

    #[test]
    fn test_parse_unknown_category_is_invalid_argument() {
        for bad in ["G", "AA", "", "1"] {
            match bad.parse::<NiCategory>() {
                Err(EngineError::InvalidArgument { field, .. }) => assert_eq!(field, "ni_category"),
                other => panic!("Expected InvalidArgument for '{}', got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for category in NiCategory::ALL {
            assert_eq!(category.to_string().parse::<NiCategory>().unwrap(), category);
        }
    }

    #[test]
    fn test_investment_zone_letters_start_april_2024() {
        for category in [NiCategory::D, NiCategory::E, NiCategory::K, NiCategory::N] {
            assert!(!category.is_valid_for(TaxYear::starting(2023)));
            assert!(category.is_valid_for(TaxYear::starting(2024)));
        }
    }

    #[test]
    fn test_freeport_letters_start_april_2022() {
        for category in [NiCategory::F, NiCategory::I, NiCategory::L, NiCategory::S] {
            assert!(!category.is_valid_for(TaxYear::starting(2021)));
            assert!(category.is_valid_for(TaxYear::starting(2022)));
        }
    }

    #[test]
    fn test_category_serializes_as_letter() {
        assert_eq!(serde_json::to_string(&NiCategory::H).unwrap(), "\"H\"");
        let category: NiCategory = serde_json::from_str("\"V\"").unwrap();
        assert_eq!(category, NiCategory::V);
    }

    #[test]
    fn test_directors_method_serialization() {
        assert_eq!(
            serde_json::to_string(&DirectorsNiMethod::Alternative).unwrap(),
            "\"alternative\""
        );
    }
}
