//! Per-fund estimation results.

use std::fmt;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::{DateIndexedSeries, FundName};

/// Output of an ordinary least squares fit.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionFit {
    /// Regressor names, in design matrix column order.
    pub regressors: Vec<String>,
    /// Estimated coefficients.
    pub coefficients: Array1<f64>,
    /// Coefficient standard errors.
    pub std_errors: Array1<f64>,
    /// t statistics.
    pub t_values: Array1<f64>,
    /// Two-sided p-values.
    pub p_values: Array1<f64>,
    /// Coefficient of determination.
    pub r_squared: f64,
    /// Adjusted R-squared.
    pub adj_r_squared: f64,
    /// Observations used after dropping missing rows.
    pub n_obs: usize,
    /// Residual degrees of freedom.
    pub df_resid: usize,
    /// Gaussian log-likelihood.
    pub log_likelihood: f64,
}

impl RegressionFit {
    /// Coefficient for a regressor.
    #[must_use]
    pub fn coefficient(&self, name: &str) -> Option<f64> {
        self.position(name).map(|i| self.coefficients[i])
    }

    /// p-value for a regressor.
    #[must_use]
    pub fn p_value(&self, name: &str) -> Option<f64> {
        self.position(name).map(|i| self.p_values[i])
    }

    /// Number of regressors, intercept included.
    #[must_use]
    pub fn n_regressors(&self) -> usize {
        self.regressors.len()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.regressors.iter().position(|r| r == name)
    }
}

/// Factor regression result for one fund.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionResult {
    /// Fund the regression was run for.
    pub fund: FundName,
    /// Fitted model.
    pub fit: RegressionFit,
    /// Human-readable summary.
    pub summary: String,
}

impl RegressionResult {
    /// `(regressor, coefficient)` pairs in design order.
    #[must_use]
    pub fn coefficient_pairs(&self) -> Vec<(String, f64)> {
        self.fit.regressors.iter().cloned().zip(self.fit.coefficients.iter().copied()).collect()
    }

    /// `(regressor, p-value)` pairs in design order.
    #[must_use]
    pub fn p_value_pairs(&self) -> Vec<(String, f64)> {
        self.fit.regressors.iter().cloned().zip(self.fit.p_values.iter().copied()).collect()
    }
}

/// A single fitted model parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterEstimate {
    /// Parameter name.
    pub name: String,
    /// Point estimate.
    pub value: f64,
    /// Standard error (`NaN` if unavailable).
    pub std_error: f64,
    /// z statistic.
    pub t_value: f64,
    /// Two-sided p-value.
    pub p_value: f64,
}

/// Output of a conditional volatility fit.
#[derive(Debug, Clone, PartialEq)]
pub struct VolatilityFit {
    /// Model description, e.g. `Constant Mean - GARCH(1,1)`.
    pub model: String,
    /// Fitted parameters, mean parameters first.
    pub params: Vec<ParameterEstimate>,
    /// Maximised log-likelihood.
    pub log_likelihood: f64,
    /// Akaike information criterion.
    pub aic: f64,
    /// Bayesian information criterion.
    pub bic: f64,
    /// Observations entering the likelihood.
    pub n_obs: usize,
    /// Optimizer iterations used.
    pub iterations: usize,
    /// Conditional volatility (standard deviation) per date.
    pub conditional_volatility: DateIndexedSeries,
    /// Standardized residuals per date.
    pub standardized_residuals: DateIndexedSeries,
}

impl VolatilityFit {
    /// Point estimate of a parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<f64> {
        self.params.iter().find(|p| p.name == name).map(|p| p.value)
    }

    /// `(name, value)` pairs in model order.
    #[must_use]
    pub fn param_pairs(&self) -> Vec<(String, f64)> {
        self.params.iter().map(|p| (p.name.clone(), p.value)).collect()
    }
}

/// Which volatility sub-model produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolatilityModelKind {
    /// Constant mean with GARCH(1,1) variance.
    Garch,
    /// Autoregressive mean (one lag) with GARCH(1,1) variance.
    Arx,
}

impl VolatilityModelKind {
    /// File prefix used for this model's outputs.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Garch => "garch",
            Self::Arx => "arx",
        }
    }
}

impl fmt::Display for VolatilityModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Volatility model result for one fund.
#[derive(Debug, Clone, PartialEq)]
pub struct VolatilityResult {
    /// Fund the model was fitted for.
    pub fund: FundName,
    /// Sub-model kind.
    pub kind: VolatilityModelKind,
    /// Fitted model.
    pub fit: VolatilityFit,
    /// Human-readable summary.
    pub summary: String,
}
