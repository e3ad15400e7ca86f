//! Error types for the payroll NI engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while calculating a pay run.
//! Every variant is fatal for the employee entry being calculated: a
//! statutory liability is never defaulted to zero.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{NiCategory, TaxYear};

/// The main error type for the payroll NI engine.
///
/// # Example
///
/// ```
/// use payroll_ni_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/2024-25.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/2024-25.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Reference data file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Reference data file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An input value was malformed or out of range.
    #[error("Invalid argument '{field}': {message}")]
    InvalidArgument {
        /// The argument or field that was invalid.
        field: String,
        /// A description of what made the argument invalid.
        message: String,
    },

    /// No NI rates exist for the category in the tax year.
    #[error("No NI rates found for category {category} in tax year {tax_year}")]
    NiRatesNotFound {
        /// The NI category letter requested.
        category: NiCategory,
        /// The tax year searched.
        tax_year: TaxYear,
    },

    /// No reference data covers the requested date.
    #[error("No {description} found for date {date}")]
    ReferenceDataNotFound {
        /// What was being looked up (e.g. "NI thresholds").
        description: String,
        /// The date for which the data was requested.
        date: NaiveDate,
    },

    /// An internal consistency check failed; indicates a programming error upstream.
    #[error("Invariant violation: {message}")]
    InvariantViolation {
        /// A description of the broken invariant.
        message: String,
    },

    /// Inputs are individually valid but contradict each other.
    #[error("Domain inconsistency: {message}")]
    DomainInconsistency {
        /// A description of the inconsistency.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidArgument`].
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/file.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/file.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_argument_displays_field_and_message() {
        let error = EngineError::invalid_argument("nicable_pay", "must not be negative");
        assert_eq!(
            error.to_string(),
            "Invalid argument 'nicable_pay': must not be negative"
        );
    }

    #[test]
    fn test_ni_rates_not_found_displays_category_and_year() {
        let error = EngineError::NiRatesNotFound {
            category: NiCategory::N,
            tax_year: TaxYear::starting(2023),
        };
        assert_eq!(
            error.to_string(),
            "No NI rates found for category N in tax year 2023-24"
        );
    }

    #[test]
    fn test_reference_data_not_found_displays_date() {
        let error = EngineError::ReferenceDataNotFound {
            description: "NI thresholds".to_string(),
            date: NaiveDate::from_ymd_opt(2019, 5, 31).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "No NI thresholds found for date 2019-05-31"
        );
    }

    #[test]
    fn test_invariant_violation_displays_message() {
        let error = EngineError::InvariantViolation {
            message: "expected 4 bands, got 3".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invariant violation: expected 4 bands, got 3"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_invariant_violation() -> EngineResult<()> {
            Err(EngineError::InvariantViolation {
                message: "test".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_invariant_violation()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
