//! Error types for transform operations.

use thiserror::Error;

/// Result type for transform operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Errors that can occur when deriving matrices from a transform.
#[derive(Debug, Clone, Copy, Error)]
pub enum TransformError {
    /// The matrix is singular (or numerically indistinguishable from
    /// singular) and cannot be inverted.
    #[error("matrix is singular (determinant {determinant:e})")]
    Singular {
        /// The determinant that failed the invertibility check.
        determinant: f64,
    },
}
