//! Estimation engine trait definitions.

use greenbond_primitives::{DateIndexedSeries, RegressionFit, VolatilityFit};
use ndarray::{Array1, Array2};

/// Errors that can occur during estimation.
#[derive(Debug, thiserror::Error)]
pub enum EstimatorError {
    /// Dimension mismatch in input data.
    #[error("dimension mismatch for {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
        /// Context description.
        context: String,
    },

    /// Insufficient data for estimation.
    #[error("insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Required number of observations.
        required: usize,
        /// Actual number of observations.
        actual: usize,
    },

    /// Rank deficiency in design matrix.
    #[error("rank deficient design matrix: rank {rank} < columns {columns}")]
    RankDeficient {
        /// Actual rank.
        rank: usize,
        /// Number of columns.
        columns: usize,
    },

    /// Optimizer did not converge.
    #[error("no convergence after {iterations} iterations: {reason}")]
    NoConvergence {
        /// Iterations performed.
        iterations: usize,
        /// What went wrong.
        reason: String,
    },

    /// Input carries no usable variation.
    #[error("degenerate input: {0}")]
    Degenerate(String),

    /// Missing values where the engine is configured to reject them.
    #[error("missing values in {0}")]
    MissingValues(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Linear algebra error.
    #[error("linear algebra error: {0}")]
    LinearAlgebra(String),
}

impl EstimatorError {
    /// Whether the error comes from the data rather than the configuration.
    #[must_use]
    pub const fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::InsufficientData { .. }
                | Self::RankDeficient { .. }
                | Self::Degenerate(_)
                | Self::MissingValues(_)
        )
    }
}

/// Linear regression engine.
pub trait RegressionEngine: Send + Sync {
    /// Configuration type for this engine.
    type Config: Default + Clone + Send + Sync;

    /// Create a new engine with the given configuration.
    fn with_config(config: Self::Config) -> Self;

    /// Fit `y = X b + e`.
    ///
    /// # Arguments
    /// * `y` - Response vector (n,)
    /// * `x` - Design matrix (n x p), intercept included by the caller
    /// * `regressors` - Column names of `x` (p,)
    ///
    /// # Errors
    /// Returns `EstimatorError` if dimensions mismatch or the fit is degenerate.
    fn fit(
        &self,
        y: &Array1<f64>,
        x: &Array2<f64>,
        regressors: &[String],
    ) -> Result<RegressionFit, EstimatorError>;
}

/// Univariate conditional volatility engine.
pub trait VolatilityEngine: Send + Sync {
    /// Configuration type for this engine.
    type Config: Default + Clone + Send + Sync;

    /// Create a new engine with the given configuration.
    fn with_config(config: Self::Config) -> Self;

    /// Short model description used in summaries.
    fn description(&self) -> String;

    /// Fit the model to a return series.
    ///
    /// # Errors
    /// Returns `EstimatorError` if the series is too short, degenerate, or the
    /// optimizer fails.
    fn fit(&self, returns: &DateIndexedSeries) -> Result<VolatilityFit, EstimatorError>;
}
