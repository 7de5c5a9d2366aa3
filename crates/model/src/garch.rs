//! GARCH(1,1) maximum-likelihood engine.
//!
//! The conditional variance follows
//! `sigma2_t = omega + alpha * eps_{t-1}^2 + beta * sigma2_{t-1}`, with the
//! pre-sample terms set to an exponentially weighted backcast of the starting
//! residuals. Estimation runs on the series divided by its standard deviation
//! and the parameters are mapped back afterwards.

use argmin::{
    core::{CostFunction, Executor, State, TerminationReason},
    solver::neldermead::NelderMead,
};
use greenbond_math::{invert_matrix, least_squares, normal_p_value, numerical_hessian};
use greenbond_primitives::{Date, DateIndexedSeries, ParameterEstimate, VolatilityFit};
use greenbond_traits::{EstimatorError, VolatilityEngine};
use ndarray::{Array1, Array2};
use tracing::debug;

use crate::error::from_math;

/// Fewest observations accepted by the likelihood.
const MIN_OBSERVATIONS: usize = 10;

/// Decay of the variance backcast weights.
const BACKCAST_DECAY: f64 = 0.94;

/// Observations entering the variance backcast.
const BACKCAST_WINDOW: usize = 75;

/// Spread of simplex likelihood values at which a pass stops.
const SD_TOLERANCE: f64 = 1e-8;

const LN_2PI: f64 = 1.837_877_066_409_345_5;

/// Conditional mean specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeanModel {
    /// Constant mean `mu`.
    Constant,
    /// Intercept plus `lags` lagged values of the series itself.
    Autoregressive {
        /// Number of lags.
        lags: usize,
    },
}

impl MeanModel {
    /// Number of mean parameters.
    #[must_use]
    pub const fn n_params(&self) -> usize {
        match self {
            Self::Constant => 1,
            Self::Autoregressive { lags } => 1 + *lags,
        }
    }

    /// Number of leading observations consumed by lags.
    #[must_use]
    pub const fn lags(&self) -> usize {
        match self {
            Self::Constant => 0,
            Self::Autoregressive { lags } => *lags,
        }
    }

    /// Parameter names, in estimation order.
    #[must_use]
    pub fn param_names(&self) -> Vec<String> {
        match self {
            Self::Constant => vec!["mu".to_string()],
            Self::Autoregressive { lags } => std::iter::once("Const".to_string())
                .chain((1..=*lags).map(|l| format!("y[{l}]")))
                .collect(),
        }
    }

    /// Short label used in model descriptions.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Constant => "Constant Mean".to_string(),
            Self::Autoregressive { lags } => format!("AR({lags})"),
        }
    }
}

/// Configuration for [`GarchEngine`].
#[derive(Debug, Clone)]
pub struct GarchConfig {
    /// Mean model.
    pub mean: MeanModel,
    /// Iteration limit per optimizer pass.
    pub max_iterations: usize,
    /// Extra optimizer passes restarted from the best point when the
    /// previous pass hit its iteration limit.
    pub restarts: usize,
}

impl Default for GarchConfig {
    fn default() -> Self {
        Self { mean: MeanModel::Constant, max_iterations: 5000, restarts: 2 }
    }
}

impl GarchConfig {
    /// Constant mean with default optimizer settings.
    #[must_use]
    pub fn constant_mean() -> Self {
        Self::default()
    }

    /// Autoregressive mean with default optimizer settings.
    #[must_use]
    pub fn autoregressive(lags: usize) -> Self {
        Self { mean: MeanModel::Autoregressive { lags }, ..Self::default() }
    }
}

/// GARCH(1,1) with normal innovations.
#[derive(Debug, Clone, Default)]
pub struct GarchEngine {
    config: GarchConfig,
}

impl GarchEngine {
    /// Constant-mean engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &GarchConfig {
        &self.config
    }
}

impl VolatilityEngine for GarchEngine {
    type Config = GarchConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn description(&self) -> String {
        format!("{} - GARCH(1,1)", self.config.mean.label())
    }

    fn fit(&self, returns: &DateIndexedSeries) -> Result<VolatilityFit, EstimatorError> {
        let mean = self.config.mean;
        if let MeanModel::Autoregressive { lags: 0 } = mean {
            return Err(EstimatorError::InvalidConfig(
                "autoregressive mean needs at least one lag".to_string(),
            ));
        }

        let sample = Sample::build(returns, mean)?;
        let n = sample.y.len();
        let k = mean.n_params();

        // Fit on unit-variance data
        let scale = sample.scale;
        let y = sample.y.mapv(|v| v / scale);
        let mut x = sample.x.clone();
        x.columns_mut().into_iter().skip(1).for_each(|mut c| c.mapv_inplace(|v| v / scale));

        let start_mean = least_squares(&y, &x).map_err(|e| from_math(e, k))?.coefficients;
        let start_resid = &y - &x.dot(&start_mean);
        let start_var = start_resid.mapv(|e| e * e).mean().unwrap_or(f64::NAN);
        if !(start_var.is_finite() && start_var > 0.0) {
            return Err(EstimatorError::Degenerate("mean model leaves no residual variance".into()));
        }

        let problem = Likelihood { y: &y, x: &x, backcast: backcast(&start_resid.to_vec()) };

        let mut point: Vec<f64> = start_mean.to_vec();
        point.extend([(0.1 * start_var).ln(), 9.0_f64.ln(), 0.125_f64.ln()]);
        let steps: Vec<f64> = (0..k).map(|_| 0.1).chain([0.5, 0.5, 0.5]).collect();

        let mut iterations = 0;
        let mut best = None;
        for _ in 0..=self.config.restarts {
            let pass = problem.minimize(&point, &steps, self.config.max_iterations).map_err(
                |reason| EstimatorError::NoConvergence { iterations, reason },
            )?;
            iterations += pass.iterations;
            point.clone_from(&pass.point);
            if pass.converged {
                best = Some(pass);
                break;
            }
        }
        let Some(minimum) = best else {
            return Err(EstimatorError::NoConvergence {
                iterations,
                reason: "iteration limit reached".to_string(),
            });
        };

        let natural = to_natural(&minimum.point, k);
        let hessian = numerical_hessian(|p| problem.neg_log_likelihood(p), &natural);
        let covariance = invert_matrix(&hessian).ok();

        // Map back to the original units
        let factors: Vec<f64> = (0..k)
            .map(|i| if i == 0 { scale } else { 1.0 })
            .chain([scale * scale, 1.0, 1.0])
            .collect();
        let names = mean.param_names().into_iter().chain(
            ["omega", "alpha[1]", "beta[1]"].into_iter().map(str::to_string),
        );
        let params: Vec<ParameterEstimate> = names
            .enumerate()
            .map(|(i, name)| {
                let var = covariance.as_ref().map_or(f64::NAN, |c| c[[i, i]]);
                let std_error = if var > 0.0 { var.sqrt() * factors[i] } else { f64::NAN };
                let value = natural[i] * factors[i];
                let t_value = value / std_error;
                let p_value = normal_p_value(t_value);
                ParameterEstimate { name, value, std_error, t_value, p_value }
            })
            .collect();

        let n_params = params.len() as f64;
        let log_likelihood = -minimum.value - n as f64 * scale.ln();
        let aic = 2.0f64.mul_add(n_params, -2.0 * log_likelihood);
        let bic = n_params.mul_add((n as f64).ln(), -2.0 * log_likelihood);

        let mean_params = &natural[..k];
        let resid = problem.residuals(mean_params);
        let variances = problem.variances(&resid, natural[k], natural[k + 1], natural[k + 2]);
        let volatility: Vec<f64> = variances.iter().map(|v| v.sqrt() * scale).collect();
        let standardized: Vec<f64> =
            resid.iter().zip(&variances).map(|(e, v)| e / v.sqrt()).collect();

        debug!(
            series = returns.name(),
            model = %self.description(),
            iterations,
            log_likelihood,
            "volatility model fitted"
        );

        Ok(VolatilityFit {
            model: self.description(),
            params,
            log_likelihood,
            aic,
            bic,
            n_obs: n,
            iterations,
            conditional_volatility: DateIndexedSeries::new(
                returns.name(),
                sample.dates.clone(),
                volatility,
            )
            .map_err(|e| EstimatorError::LinearAlgebra(e.to_string()))?,
            standardized_residuals: DateIndexedSeries::new(
                returns.name(),
                sample.dates,
                standardized,
            )
            .map_err(|e| EstimatorError::LinearAlgebra(e.to_string()))?,
        })
    }
}

/// Observations and mean regressors in the original units.
struct Sample {
    dates: Vec<Date>,
    y: Array1<f64>,
    /// Intercept column followed by lagged values.
    x: Array2<f64>,
    scale: f64,
}

impl Sample {
    fn build(returns: &DateIndexedSeries, mean: MeanModel) -> Result<Self, EstimatorError> {
        let (dates, values): (Vec<Date>, Vec<f64>) =
            returns.iter().filter(|(_, v)| !v.is_nan()).unzip();
        let lags = mean.lags();
        let n = values.len().saturating_sub(lags);
        if n < MIN_OBSERVATIONS {
            return Err(EstimatorError::InsufficientData { required: MIN_OBSERVATIONS, actual: n });
        }

        let y = Array1::from_iter(values[lags..].iter().copied());
        let x = Array2::from_shape_fn((n, 1 + lags), |(t, j)| {
            if j == 0 { 1.0 } else { values[lags + t - j] }
        });

        let mu = y.mean().unwrap_or(f64::NAN);
        let scale = (y.mapv(|v| (v - mu).powi(2)).sum() / n as f64).sqrt();
        if !(scale.is_finite() && scale > 0.0) {
            return Err(EstimatorError::Degenerate("return series has zero variance".to_string()));
        }

        Ok(Self { dates: dates[lags..].to_vec(), y, x, scale })
    }
}

/// Gaussian likelihood of the mean and variance recursions.
#[derive(Clone)]
struct Likelihood<'a> {
    y: &'a Array1<f64>,
    x: &'a Array2<f64>,
    backcast: f64,
}

impl Likelihood<'_> {
    fn residuals(&self, mean: &[f64]) -> Vec<f64> {
        let beta = Array1::from_iter(mean.iter().copied());
        (self.y - &self.x.dot(&beta)).to_vec()
    }

    fn variances(&self, resid: &[f64], omega: f64, alpha: f64, beta: f64) -> Vec<f64> {
        let mut out = Vec::with_capacity(resid.len());
        let mut prev_sq = self.backcast;
        let mut prev_var = self.backcast;
        for &e in resid {
            let var = beta.mul_add(prev_var, alpha.mul_add(prev_sq, omega));
            out.push(var);
            prev_sq = e * e;
            prev_var = var;
        }
        out
    }

    /// Negative log-likelihood in natural parameters
    /// `[mean..., omega, alpha, beta]`, `+inf` outside the stationary region.
    fn neg_log_likelihood(&self, params: &[f64]) -> f64 {
        let k = params.len() - 3;
        let (omega, alpha, beta) = (params[k], params[k + 1], params[k + 2]);
        if omega <= 0.0 || alpha < 0.0 || beta < 0.0 || alpha + beta >= 1.0 {
            return f64::INFINITY;
        }

        let resid = self.residuals(&params[..k]);
        let variances = self.variances(&resid, omega, alpha, beta);
        let nll: f64 = resid
            .iter()
            .zip(&variances)
            .map(|(e, v)| 0.5 * (LN_2PI + v.ln() + e * e / v))
            .sum();
        if nll.is_finite() { nll } else { f64::INFINITY }
    }

    /// One Nelder-Mead pass in the unconstrained parameterization, starting
    /// from a simplex with one vertex offset by `steps` along each axis.
    fn minimize(
        &self,
        start: &[f64],
        steps: &[f64],
        max_iterations: usize,
    ) -> Result<SimplexPass, String> {
        let mut simplex = vec![start.to_vec()];
        simplex.extend(steps.iter().enumerate().map(|(i, step)| {
            let mut vertex = start.to_vec();
            vertex[i] += step;
            vertex
        }));

        let solver = NelderMead::new(simplex)
            .with_sd_tolerance(SD_TOLERANCE)
            .map_err(|e| e.to_string())?;
        let result = Executor::new(self.clone(), solver)
            .configure(|state| state.max_iters(max_iterations as u64))
            .run()
            .map_err(|e| e.to_string())?;

        let state = result.state();
        let value = state.get_best_cost();
        let Some(point) = state.get_best_param().filter(|_| value.is_finite()) else {
            return Err("likelihood not finite at any simplex vertex".to_string());
        };
        Ok(SimplexPass {
            point: point.clone(),
            value,
            iterations: state.get_iter() as usize,
            converged: matches!(
                state.get_termination_reason(),
                Some(TerminationReason::SolverConverged)
            ),
        })
    }
}

impl CostFunction for Likelihood<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        Ok(self.neg_log_likelihood(&to_natural(theta, self.x.ncols())))
    }
}

/// Outcome of one optimizer pass.
struct SimplexPass {
    point: Vec<f64>,
    value: f64,
    iterations: usize,
    converged: bool,
}

/// Exponentially weighted mean of the leading squared residuals.
fn backcast(resid: &[f64]) -> f64 {
    let tau = resid.len().min(BACKCAST_WINDOW);
    let weights: Vec<f64> = (0..tau).map(|i| BACKCAST_DECAY.powi(i as i32)).collect();
    let total: f64 = weights.iter().sum();
    weights.iter().zip(resid).map(|(w, e)| w * e * e).sum::<f64>() / total
}

/// Map unconstrained `[mean..., w, a, b]` to `[mean..., omega, alpha, beta]`.
fn to_natural(theta: &[f64], k: usize) -> Vec<f64> {
    let omega = theta[k].exp();
    let persistence = logistic(theta[k + 1]);
    let alpha = persistence * logistic(theta[k + 2]);
    let mut out = theta[..k].to_vec();
    out.extend([omega, alpha, persistence - alpha]);
    out
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
