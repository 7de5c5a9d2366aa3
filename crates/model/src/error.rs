//! Error types for model estimation.

use greenbond_math::MathError;
use greenbond_primitives::SeriesError;
use greenbond_traits::EstimatorError;

/// Errors that can occur during model estimation.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Estimator error.
    #[error("estimator error: {0}")]
    Estimator(#[from] EstimatorError),

    /// Math error.
    #[error("math error: {0}")]
    Math(#[from] MathError),

    /// Series construction error.
    #[error("series error: {0}")]
    Series(#[from] SeriesError),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ModelError {
    /// Whether the failure is caused by the data rather than the setup.
    #[must_use]
    pub const fn is_data_error(&self) -> bool {
        match self {
            Self::Estimator(e) => e.is_data_error(),
            Self::Math(_) | Self::Series(_) => true,
            Self::InvalidConfig(_) => false,
        }
    }
}

/// Translate a linear algebra failure into an estimator error.
pub(crate) fn from_math(err: MathError, columns: usize) -> EstimatorError {
    match err {
        MathError::Singular { pivot, .. } => EstimatorError::RankDeficient { rank: pivot, columns },
        MathError::DimensionMismatch { expected, actual } => EstimatorError::DimensionMismatch {
            expected,
            actual,
            context: "design matrix".to_string(),
        },
        MathError::EmptyData => EstimatorError::InsufficientData { required: 1, actual: 0 },
        other => EstimatorError::LinearAlgebra(other.to_string()),
    }
}
