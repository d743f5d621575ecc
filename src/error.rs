//! Error types for the PCA engine.

use thiserror::Error;

/// Result type alias for PCA operations.
pub type Result<T> = std::result::Result<T, PcaError>;

/// Errors that can occur while fitting or querying a decomposition.
#[derive(Error, Debug)]
pub enum PcaError {
    /// The input matrix is malformed or insufficient for a fit.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A column of the input matrix is not mean-centered and unit-scaled.
    ///
    /// `fit` treats this as a soft precondition violation and only logs it;
    /// this variant is returned by [`crate::StandardizedPanel::verify`] for
    /// callers that want the hard form.
    #[error(
        "column '{variable}' is not standardized (mean {mean:.6}, std {std:.6}, tolerance {tolerance:e})"
    )]
    NotStandardized {
        variable: String,
        mean: f64,
        std: f64,
        tolerance: f64,
    },
    /// Data passed to `transform` does not match the fitted variable count.
    #[error("dimension mismatch: fitted on {expected} variables, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    /// The requested cumulative-variance threshold exceeds total variance.
    #[error("variance threshold {tau} is unreachable (cumulative share tops out at {max_share:.6})")]
    UnreachableThreshold { tau: f64, max_share: f64 },
    /// A component or variable index outside the decomposition was requested.
    #[error("index out of range: {0}")]
    IndexOutOfRange(String),
    /// The LAPACK backend failed.
    #[error("linear algebra backend error: {0}")]
    Backend(String),
    /// An IO error during model persistence.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// A serialization error during model persistence.
    #[error("serialization error: {0}")]
    Serialization(String),
}
