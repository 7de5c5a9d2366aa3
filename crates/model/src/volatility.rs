//! Per-fund conditional volatility fits.

use greenbond_primitives::{DateIndexedSeries, FundName, VolatilityModelKind, VolatilityResult};
use greenbond_traits::VolatilityEngine;
use tracing::debug;

use crate::{GarchConfig, GarchEngine, ModelError, volatility_summary};

/// GARCH and ARX results for one fund.
#[derive(Debug, Clone)]
pub struct VolatilityResults {
    /// Constant mean with GARCH(1,1) variance.
    pub garch: VolatilityResult,
    /// AR(1) mean with GARCH(1,1) variance.
    pub arx: VolatilityResult,
}

impl VolatilityResults {
    /// Both results, GARCH first.
    #[must_use]
    pub fn iter(&self) -> [&VolatilityResult; 2] {
        [&self.garch, &self.arx]
    }
}

/// Fits the two volatility sub-models independently.
#[derive(Debug, Clone)]
pub struct VolatilityModelRunner {
    garch: GarchEngine,
    arx: GarchEngine,
}

impl Default for VolatilityModelRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl VolatilityModelRunner {
    /// Constant-mean GARCH(1,1) and AR(1)-GARCH(1,1).
    #[must_use]
    pub fn new() -> Self {
        Self::with_configs(GarchConfig::constant_mean(), GarchConfig::autoregressive(1))
    }

    /// Runner with explicit engine configurations.
    #[must_use]
    pub fn with_configs(garch: GarchConfig, arx: GarchConfig) -> Self {
        Self { garch: GarchEngine::with_config(garch), arx: GarchEngine::with_config(arx) }
    }

    /// Fit both sub-models to one fund's returns.
    ///
    /// # Errors
    /// Returns `ModelError` if either fit fails.
    pub fn run(
        &self,
        fund: &FundName,
        returns: &DateIndexedSeries,
    ) -> Result<VolatilityResults, ModelError> {
        Ok(VolatilityResults {
            garch: fit_one(&self.garch, VolatilityModelKind::Garch, fund, returns)?,
            arx: fit_one(&self.arx, VolatilityModelKind::Arx, fund, returns)?,
        })
    }
}

fn fit_one(
    engine: &GarchEngine,
    kind: VolatilityModelKind,
    fund: &FundName,
    returns: &DateIndexedSeries,
) -> Result<VolatilityResult, ModelError> {
    debug!(fund = %fund, model = %kind, "fitting volatility model");
    let fit = engine.fit(returns)?;
    let summary = volatility_summary(fund, &fit);
    Ok(VolatilityResult { fund: fund.clone(), kind, fit, summary })
}
