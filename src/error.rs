//! Error types for the gas price editor

use std::fmt;
use thiserror::Error;

/// Main error type for the editor and its collaborators
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("RPC error calling {method}: {message}")]
    Rpc { method: String, message: String },

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Transaction submission failed: {0}")]
    Submission(String),

    #[error("Timeout waiting for {operation}")]
    Timeout { operation: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for editor operations
pub type EditorResult<T> = Result<T, EditorError>;

/// Validation failures a field can be flagged with
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationError {
    #[error("the supplied amount should be a valid positive number")]
    NegativeValue,

    #[error("the transaction execution will exceed the block gas limit")]
    ExceedsBlockLimit,

    #[error("the transaction execution will throw an exception with the current values")]
    GasEstimationException,
}

impl ValidationError {
    /// Stable label, used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::NegativeValue => "negative_value",
            ValidationError::ExceedsBlockLimit => "exceeds_block_limit",
            ValidationError::GasEstimationException => "gas_estimation_exception",
        }
    }
}

/// Error attached to an editor field.
///
/// Validated fields only ever carry a [`ValidationError`]; the total and the
/// estimation error can also be set to a message computed by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    Validation(ValidationError),
    Message(String),
}

impl FieldError {
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Validation(e) => write!(f, "{}", e),
            FieldError::Message(m) => f.write_str(m),
        }
    }
}

impl From<ValidationError> for FieldError {
    fn from(e: ValidationError) -> Self {
        FieldError::Validation(e)
    }
}

impl From<&str> for FieldError {
    fn from(m: &str) -> Self {
        FieldError::Message(m.to_string())
    }
}

impl From<String> for FieldError {
    fn from(m: String) -> Self {
        FieldError::Message(m)
    }
}
