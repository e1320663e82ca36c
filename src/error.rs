//! Error types for SPC computations.
//!
//! Every chart constructor and rule query is fallible. Errors are raised at
//! the point of detection; nothing is clamped or defaulted.

use thiserror::Error;

/// Error type for all chart, rule and capability operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpcError {
    /// Malformed configuration, e.g. a subgroup size below 1.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Not enough values for a statistic to be defined.
    #[error("Insufficient data: expected at least {expected} values, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Subgroup size outside the anti-bias constant table.
    #[error("No anti-bias constants for subgroup size {0} (supported: 2..=25)")]
    Lookup(usize),

    /// Paired sequences of unequal length.
    #[error("Shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Value outside its mathematically valid range.
    #[error("Domain error: {0}")]
    Domain(String),

    /// Rule evaluator built without a center or sigma.
    #[error("Missing rule parameter: {0}")]
    MissingParameter(&'static str),
}

/// Result type alias using [`SpcError`].
pub type Result<T> = std::result::Result<T, SpcError>;

impl SpcError {
    /// Error for a slice containing NaN or infinite values.
    pub fn non_finite(context: &str) -> Self {
        Self::Domain(format!("{context} contains NaN or infinite values"))
    }

    /// Error for a statistic that needs at least `expected` values.
    pub fn insufficient(expected: usize, actual: usize) -> Self {
        Self::InsufficientData { expected, actual }
    }
}
