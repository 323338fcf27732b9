//! Error types for queryfilter.

use thiserror::Error;

use crate::value::Kind;

/// The main error type for queryfilter operations.
///
/// Every error is terminal for the call that produced it: no partial
/// fragment is ever returned alongside one.
#[derive(Debug, Error)]
pub enum FilterError {
    /// The value handed to `to_sql` is not a record.
    #[error("unable to build filter: provided value is not a struct (got {0})")]
    NotARecord(Kind),

    /// A tag has a comma but no well-formed `op=<name>` segment.
    #[error("incorrectly formatted tag: {0}")]
    MalformedTag(String),

    /// A field holds a value the extractor cannot normalize.
    #[error("unsupported type: {0}")]
    UnsupportedType(Kind),

    /// An operator was applied to a field of the wrong kind.
    #[error("expected {expected}; got {actual} for operation {operator}")]
    TypeMismatch {
        expected: String,
        actual: Kind,
        operator: String,
    },

    /// The tag names an operator that is not registered.
    #[error("operator {0} is not available")]
    UnknownOperator(String),

    /// An operator received too few sequence elements.
    #[error("operation {operator} expects {} elements in its slice, got {actual}", spell(.expected))]
    Arity {
        operator: String,
        expected: usize,
        actual: usize,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A value cannot be bound by the database layer.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error.
    #[error("Execution error: {0}")]
    Execution(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FilterError {
    /// Create a type mismatch error for `operator`.
    pub fn mismatch(expected: impl Into<String>, actual: Kind, operator: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            actual,
            operator: operator.into(),
        }
    }
}

fn spell(n: &usize) -> String {
    match *n {
        1 => "one".to_string(),
        2 => "two".to_string(),
        3 => "three".to_string(),
        n => n.to_string(),
    }
}

/// Result type alias for queryfilter operations.
pub type FilterResult<T> = Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FilterError::mismatch("slice or array", Kind::String, "in");
        assert_eq!(
            err.to_string(),
            "expected slice or array; got string for operation in"
        );
    }

    #[test]
    fn test_unknown_operator_display() {
        let err = FilterError::UnknownOperator("like".to_string());
        assert_eq!(err.to_string(), "operator like is not available");
    }

    #[test]
    fn test_arity_display() {
        let err = FilterError::Arity {
            operator: "between".to_string(),
            expected: 2,
            actual: 1,
        };
        assert_eq!(
            err.to_string(),
            "operation between expects two elements in its slice, got 1"
        );
    }
}
