use thiserror::Error;

use crate::parameters::expression::ExpressionError;

/// Error types for the specfit-rs library.
#[derive(Error, Debug)]
pub enum SpecFitError {
    /// Two keyword arguments that say the same thing were both supplied.
    #[error("Conflicting arguments: {0}")]
    ConflictingArguments(String),

    /// Input data that cannot be fit as given.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The solver reported status 0.
    #[error("Solver failure (status {status}): {message}")]
    SolverFailure { status: i32, message: String },

    /// The fit finished but its goodness-of-fit statistic is unusable.
    #[error("Invalid fit: {0}")]
    InvalidFit(String),

    /// A result accessor was called before any successful fit.
    #[error("No fit result available; run a fit first")]
    NoFitResult,

    /// Error indicating a mismatch in array lengths.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// A keyword argument carried a value of the wrong kind.
    #[error("Invalid keyword argument '{key}': expected {expected}")]
    InvalidKeyword { key: String, expected: String },

    /// Error while parsing or evaluating a tie expression.
    #[error("Expression error: {0}")]
    Expression(#[from] ExpressionError),

    /// The axis could not be converted to the requested unit.
    #[error("Unit conversion error: {0}")]
    UnitConversion(String),

    /// I/O error wrapper.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for specfit-rs operations.
pub type Result<T> = std::result::Result<T, SpecFitError>;

impl SpecFitError {
    pub(crate) fn keyword(key: &str, expected: &str) -> Self {
        SpecFitError::InvalidKeyword {
            key: key.to_string(),
            expected: expected.to_string(),
        }
    }
}
