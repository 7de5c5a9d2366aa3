//! Aggregate return series from a fund price panel.

use greenbond_primitives::{Date, DateIndexedSeries, DateWindow, FundPricePanel, ReturnsType};
use greenbond_traits::ReturnTransform;
use tracing::{debug, warn};

use crate::{UtilsError, backward_fill, forward_fill, pct_change};

/// Default number of consecutive missing prices bridged by forward fill.
pub const DEFAULT_GAP_LIMIT: usize = 5;

/// Configuration for [`ReturnComputer`].
#[derive(Debug, Clone)]
pub struct ReturnConfig {
    /// Return convention.
    pub returns_type: ReturnsType,
    /// Inclusive output window.
    pub window: DateWindow,
    /// Maximum consecutive forward fills per price column.
    pub gap_limit: usize,
}

impl ReturnConfig {
    /// Create a configuration with the default gap limit.
    #[must_use]
    pub const fn new(returns_type: ReturnsType, window: DateWindow) -> Self {
        Self { returns_type, window, gap_limit: DEFAULT_GAP_LIMIT }
    }

    /// Override the gap limit.
    #[must_use]
    pub const fn with_gap_limit(mut self, gap_limit: usize) -> Self {
        self.gap_limit = gap_limit;
        self
    }
}

/// Converts a [`FundPricePanel`] into one aggregate return series.
///
/// Every price column is forward filled (up to the gap limit), turned into
/// period changes and transformed by the configured convention over its
/// full history. The columns are then averaged per date ignoring missing
/// values, restricted to the window and backward filled once.
#[derive(Debug, Clone)]
pub struct ReturnComputer {
    config: ReturnConfig,
}

impl ReturnComputer {
    /// Create a computer from its configuration.
    #[must_use]
    pub const fn new(config: ReturnConfig) -> Self {
        Self { config }
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &ReturnConfig {
        &self.config
    }

    /// Windowed aggregate returns before the final backward fill.
    ///
    /// # Errors
    /// Returns `UtilsError` if the panel dates cannot index a series.
    pub fn raw_returns(&self, panel: &FundPricePanel) -> Result<DateIndexedSeries, UtilsError> {
        let transform = &self.config.returns_type;
        let limit = Some(self.config.gap_limit);

        let columns: Vec<Vec<f64>> = (0..panel.n_columns())
            .map(|j| {
                let prices = panel.column(j).to_vec();
                let filled = forward_fill(&prices, limit);
                transform.transform(&pct_change(&filled))
            })
            .collect();

        let averaged =
            (0..panel.n_dates()).map(|i| nan_mean(columns.iter().map(|c| c[i]))).collect();

        let series =
            DateIndexedSeries::new(panel.fund().as_str(), panel.dates().to_vec(), averaged)?;
        Ok(series.window(&self.config.window))
    }

    /// Windowed aggregate returns with remaining gaps backward filled.
    ///
    /// Dates still missing before the fill are reported as a warning.
    ///
    /// # Errors
    /// Returns `UtilsError` if the panel dates cannot index a series.
    pub fn compute(&self, panel: &FundPricePanel) -> Result<DateIndexedSeries, UtilsError> {
        let raw = self.raw_returns(panel)?;

        let missing = raw.missing_dates();
        if !missing.is_empty() {
            warn!(
                fund = %panel.fund(),
                count = missing.len(),
                dates = %format_dates(&missing),
                "missing returns in window, backward filling"
            );
        }

        let filled = raw.with_values(backward_fill(raw.values()))?;
        debug!(
            fund = %panel.fund(),
            returns = %self.config.returns_type,
            observations = filled.len(),
            "computed returns"
        );
        Ok(filled)
    }
}

fn nan_mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) =
        values.filter(|v| !v.is_nan()).fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 { f64::NAN } else { sum / count as f64 }
}

fn format_dates(dates: &[Date]) -> String {
    dates.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
