//! Error types for mathematical operations.

/// Errors that can occur during mathematical operations.
#[derive(Debug, thiserror::Error)]
pub enum MathError {
    /// Dimension mismatch.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// Singular or nearly singular matrix.
    #[error("matrix is singular or nearly singular (pivot {pivot} of {size})")]
    Singular {
        /// Column at which elimination broke down.
        pivot: usize,
        /// Matrix size.
        size: usize,
    },

    /// Linear algebra error.
    #[error("linear algebra error: {0}")]
    LinearAlgebra(String),

    /// Empty data.
    #[error("empty data provided")]
    EmptyData,

    /// Numerical instability (NaN or Inf).
    #[error("numerical instability: {0}")]
    NumericalInstability(String),
}
