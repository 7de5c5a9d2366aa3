//! Factor regression of fund excess returns.

use greenbond_primitives::{Date, DateIndexedSeries, FactorSet, FundName, RegressionResult};
use greenbond_traits::RegressionEngine;
use greenbond_utils::align_with_factors;
use ndarray::{Array1, Array2, s};
use tracing::debug;

use crate::{ModelError, OlsEngine, regression_summary};

/// Name of the intercept regressor.
pub const INTERCEPT: &str = "const";

/// Aligned regression inputs for one fund.
#[derive(Debug, Clone)]
pub struct FactorDesign {
    /// Common dates of fund returns and factors.
    pub dates: Vec<Date>,
    /// Fund return minus the risk-free rate.
    pub excess: Array1<f64>,
    /// Intercept column followed by the factor columns.
    pub design: Array2<f64>,
    /// Column names of `design`.
    pub regressors: Vec<String>,
}

impl FactorDesign {
    /// Align `returns` with `factors` and build the regression inputs.
    #[must_use]
    pub fn build(returns: &DateIndexedSeries, factors: &FactorSet) -> Self {
        let (returns, factors) = align_with_factors(returns, factors);
        let n = returns.len();

        let excess = Array1::from_iter(
            returns.values().iter().zip(factors.risk_free()).map(|(r, rf)| r - rf),
        );

        let mut design = Array2::ones((n, 1 + factors.n_factors()));
        design.slice_mut(s![.., 1..]).assign(factors.values());

        let regressors = std::iter::once(INTERCEPT.to_string())
            .chain(factors.names().iter().map(ToString::to_string))
            .collect();

        Self { dates: returns.dates().to_vec(), excess, design, regressors }
    }
}

/// Runs the factor regression for a fund with a pluggable engine.
#[derive(Debug, Clone, Default)]
pub struct FactorModelRunner<E = OlsEngine> {
    engine: E,
}

impl FactorModelRunner<OlsEngine> {
    /// Runner using OLS that drops incomplete rows.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: RegressionEngine> FactorModelRunner<E> {
    /// Runner using the given engine.
    #[must_use]
    pub const fn with_engine(engine: E) -> Self {
        Self { engine }
    }

    /// Regress the fund's excess returns on the factors plus an intercept.
    ///
    /// # Errors
    /// Returns `ModelError` if the engine rejects the aligned sample.
    pub fn run(
        &self,
        fund: &FundName,
        returns: &DateIndexedSeries,
        factors: &FactorSet,
    ) -> Result<RegressionResult, ModelError> {
        let design = FactorDesign::build(returns, factors);
        debug!(
            fund = %fund,
            observations = design.dates.len(),
            regressors = design.regressors.len(),
            "running factor regression"
        );

        let fit = self.engine.fit(&design.excess, &design.design, &design.regressors)?;
        let summary = regression_summary(fund, &fit);
        Ok(RegressionResult { fund: fund.clone(), fit, summary })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use greenbond_primitives::FactorName;
    use greenbond_traits::EstimatorError;

    use super::*;

    fn day(i: usize) -> Date {
        Date::from_num_days_from_ce_opt(735_600 + i as i32).unwrap()
    }

    fn factors(n: usize) -> FactorSet {
        let values = Array2::from_shape_fn((n, 4), |(i, j)| {
            ((i * (j + 2)) as f64 * 0.37).sin() * 0.01
        });
        FactorSet::new(
            (0..n).map(day).collect(),
            ["Mkt-RF", "SMB", "HML", "WML"].into_iter().map(FactorName::new).collect(),
            values,
            (0..n).map(|i| 0.0001 + i as f64 * 1e-7).collect(),
        )
        .unwrap()
    }

    #[test]
    fn design_uses_excess_returns_and_intercept() {
        let f = factors(30);
        // fund starts two days later and runs past the factor index
        let fund = DateIndexedSeries::new(
            "FundA",
            (2..40).map(day).collect(),
            (2..40).map(|i| i as f64 * 0.001).collect(),
        )
        .unwrap();

        let design = FactorDesign::build(&fund, &f);
        assert_eq!(design.dates.len(), 28);
        assert_eq!(design.dates[0], day(2));
        assert_eq!(design.regressors, ["const", "Mkt-RF", "SMB", "HML", "WML"]);
        assert!(design.design.column(0).iter().all(|v| *v == 1.0));

        for (k, date) in design.dates.iter().enumerate() {
            let rf = f.risk_free()[k + 2];
            assert_relative_eq!(design.excess[k], fund.get(*date).unwrap() - rf);
            assert_eq!(design.design[[k, 3]], f.values()[[k + 2, 2]]);
        }
    }

    #[test]
    fn run_returns_one_estimate_per_regressor() {
        let f = factors(60);
        let beta = [0.0002, 0.9, 0.2, -0.3, 0.1];
        let values: Vec<f64> = (0..60)
            .map(|i| {
                let row = f.values().row(i);
                beta[0]
                    + row.iter().zip(&beta[1..]).map(|(x, b)| x * b).sum::<f64>()
                    + f.risk_free()[i]
                    + ((i as f64) * 1.7).sin() * 1e-4
            })
            .collect();
        let fund = DateIndexedSeries::new("FundA", (0..60).map(day).collect(), values).unwrap();

        let result = FactorModelRunner::new().run(&"FundA".into(), &fund, &f).unwrap();
        assert_eq!(result.coefficient_pairs().len(), 5);
        assert_eq!(result.p_value_pairs().len(), 5);
        assert_eq!(result.fit.regressors[0], INTERCEPT);
        assert_relative_eq!(result.fit.coefficient("Mkt-RF").unwrap(), 0.9, epsilon = 0.05);
        assert!(result.summary.contains("Dep. Variable:,FundA"));
    }

    #[test]
    fn disjoint_dates_fail_with_insufficient_data() {
        let f = factors(10);
        let fund = DateIndexedSeries::new(
            "FundB",
            (100..120).map(day).collect(),
            vec![0.001; 20],
        )
        .unwrap();

        let err = FactorModelRunner::new().run(&"FundB".into(), &fund, &f).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Estimator(EstimatorError::InsufficientData { actual: 0, .. })
        ));
    }
}
