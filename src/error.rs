//! Error types for the sales rule core

use thiserror::Error;

/// Main error type for rule parsing and evaluation
///
/// Every variant describes a malformed rule or subject. None of them is
/// retriable, and evaluation never turns one into a `false` result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("Attribute not found: {0}")]
    AttributeNotFound(String),

    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    #[error("Unknown aggregator: {0}")]
    UnknownAggregator(String),

    #[error("Unknown condition type: {0}")]
    UnknownConditionType(String),

    #[error("Unknown subselect strategy: {0}")]
    UnknownStrategy(String),

    #[error("Type mismatch: {operator} requires {expected}")]
    TypeMismatch {
        operator: &'static str,
        expected: &'static str,
    },

    #[error("Incomparable values: {left} {operator} {right}")]
    Incomparable {
        left: String,
        operator: &'static str,
        right: String,
    },

    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    #[error("Operator {0} requires a value")]
    MissingValue(&'static str),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

impl From<serde_json::Error> for RuleError {
    fn from(err: serde_json::Error) -> Self {
        RuleError::DeserializationError(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<RuleError> for pyo3::PyErr {
    fn from(err: RuleError) -> pyo3::PyErr {
        use pyo3::exceptions::{PyKeyError, PyValueError};

        match err {
            RuleError::AttributeNotFound(_) => PyKeyError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

/// Result type alias for the sales rule core
pub type Result<T> = std::result::Result<T, RuleError>;
