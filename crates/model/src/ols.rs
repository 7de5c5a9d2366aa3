//! Ordinary least squares engine.

use greenbond_math::{least_squares, student_t_p_value};
use greenbond_primitives::RegressionFit;
use greenbond_traits::{EstimatorError, RegressionEngine};
use ndarray::{Array1, Array2, Axis};
use tracing::trace;

use crate::error::from_math;

/// How rows with missing values are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Drop any row with a missing response or regressor.
    #[default]
    Drop,
    /// Reject input containing missing values.
    Raise,
}

/// Configuration for [`OlsEngine`].
#[derive(Debug, Clone, Default)]
pub struct OlsConfig {
    /// Missing value handling.
    pub missing: MissingPolicy,
}

/// OLS with classical (non-robust) standard errors.
#[derive(Debug, Clone, Default)]
pub struct OlsEngine {
    config: OlsConfig,
}

impl OlsEngine {
    /// Create an engine that drops missing rows.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Missing value policy.
    #[must_use]
    pub const fn missing(&self) -> MissingPolicy {
        self.config.missing
    }
}

impl RegressionEngine for OlsEngine {
    type Config = OlsConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn fit(
        &self,
        y: &Array1<f64>,
        x: &Array2<f64>,
        regressors: &[String],
    ) -> Result<RegressionFit, EstimatorError> {
        if x.nrows() != y.len() {
            return Err(EstimatorError::DimensionMismatch {
                expected: y.len(),
                actual: x.nrows(),
                context: "design matrix rows".to_string(),
            });
        }
        if regressors.len() != x.ncols() {
            return Err(EstimatorError::DimensionMismatch {
                expected: x.ncols(),
                actual: regressors.len(),
                context: "regressor names".to_string(),
            });
        }

        let complete: Vec<usize> = (0..y.len())
            .filter(|&i| !y[i].is_nan() && x.row(i).iter().all(|v| !v.is_nan()))
            .collect();

        if complete.len() < y.len() {
            match self.config.missing {
                MissingPolicy::Raise => {
                    return Err(EstimatorError::MissingValues(
                        "response or design matrix".to_string(),
                    ));
                }
                MissingPolicy::Drop => {
                    trace!(dropped = y.len() - complete.len(), "dropping incomplete rows");
                }
            }
        }

        let y = y.select(Axis(0), &complete);
        let x = x.select(Axis(0), &complete);
        let (n, p) = x.dim();

        if n == 0 || n < p {
            return Err(EstimatorError::InsufficientData { required: p.max(1), actual: n });
        }

        let ls = least_squares(&y, &x).map_err(|e| from_math(e, p))?;

        let df_resid = n - p;
        let sigma2 = if df_resid > 0 { ls.ssr / df_resid as f64 } else { f64::NAN };
        let std_errors: Array1<f64> = ls.xtx_inv.diag().mapv(|v| (sigma2 * v).sqrt());
        let t_values = &ls.coefficients / &std_errors;
        let p_values = t_values.mapv(|t| student_t_p_value(t, df_resid as f64));

        let adj_r_squared = if df_resid > 0 {
            1.0 - (1.0 - ls.r_squared) * (n - 1) as f64 / df_resid as f64
        } else {
            f64::NAN
        };
        let nf = n as f64;
        let log_likelihood =
            -0.5 * nf * ((2.0 * std::f64::consts::PI).ln() + (ls.ssr / nf).ln() + 1.0);

        Ok(RegressionFit {
            regressors: regressors.to_vec(),
            coefficients: ls.coefficients,
            std_errors,
            t_values,
            p_values,
            r_squared: ls.r_squared,
            adj_r_squared,
            n_obs: n,
            df_resid,
            log_likelihood,
        })
    }
}
