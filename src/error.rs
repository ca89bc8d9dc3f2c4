//! Error types for detector operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for fitting and scoring detectors.
///
/// # Examples
///
/// ```
/// use gaal::error::GaalError;
///
/// let err = GaalError::DimensionMismatch {
///     expected: "n_features=3".to_string(),
///     actual: "2".to_string(),
/// };
/// assert!(err.to_string().contains("dimension mismatch"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum GaalError {
    /// Matrix dimensions don't match what the fitted model expects.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Invalid hyperparameter value provided.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Input has no rows or no columns.
    EmptyInput {
        /// What was empty
        context: String,
    },

    /// Input contains NaN or infinity.
    NonFiniteInput {
        /// Row of the first offending value
        row: usize,
        /// Column of the first offending value
        col: usize,
    },

    /// Scoring was requested before a successful `fit`.
    NotFitted {
        /// Estimator name
        estimator: &'static str,
    },

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for GaalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GaalError::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "Matrix dimension mismatch: expected {expected}, got {actual}"
                )
            }
            GaalError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            GaalError::EmptyInput { context } => write!(f, "empty input: {context}"),
            GaalError::NonFiniteInput { row, col } => {
                write!(f, "Input contains NaN or infinity at ({row}, {col})")
            }
            GaalError::NotFitted { estimator } => {
                write!(f, "{estimator} not fitted. Call fit() first")
            }
            GaalError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for GaalError {}

impl From<&str> for GaalError {
    fn from(msg: &str) -> Self {
        GaalError::Other(msg.to_string())
    }
}

impl From<String> for GaalError {
    fn from(msg: String) -> Self {
        GaalError::Other(msg)
    }
}

impl GaalError {
    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create an empty input error
    #[must_use]
    pub fn empty_input(context: &str) -> Self {
        Self::EmptyInput {
            context: context.to_string(),
        }
    }

    /// Create an invalid hyperparameter error.
    #[must_use]
    pub fn invalid_hyperparameter(param: &str, value: impl fmt::Display, constraint: &str) -> Self {
        Self::InvalidHyperparameter {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, GaalError>;
