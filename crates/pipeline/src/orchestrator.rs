//! Per-run analysis driver.

use std::{
    fs,
    path::{Path, PathBuf},
};

use greenbond_math::{DescriptiveStats, describe};
use greenbond_model::{FactorModelRunner, ModelError, VolatilityModelRunner};
use greenbond_primitives::{FactorSet, FundName, VolatilityResult};
use greenbond_utils::{ReturnComputer, ReturnConfig};
use tracing::{error, info, warn};

use crate::{
    AggregateTableBuilder, CsvSheetDirectory, PipelineError, PriceSource, RegionTable,
    RegressionCoefficients, RegressionPValues, RunConfig, load_factors, plot_returns,
    plot_volatility,
    preview::{HEAD_ROWS, factor_head, panel_head},
};

/// Aggregate table file names, in write order.
const STATS_TABLE: &str = "greenbond_stats.csv";
const OLS_TABLE: &str = "greenbond_ols.csv";
const OLS_PVALUES_TABLE: &str = "greenbond_ols_pvalues.csv";
const GARCH_TABLE: &str = "greenbond_garch.csv";
const ARX_TABLE: &str = "greenbond_arx.csv";

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Directory all files were written to.
    pub output_dir: PathBuf,
    /// Funds processed, in source order.
    pub funds: Vec<FundName>,
    /// Files written, in write order.
    pub files: Vec<PathBuf>,
}

/// Result of one configuration within [`AnalysisOrchestrator::run_all`].
#[derive(Debug)]
pub struct RunOutcome {
    /// Configuration that was run.
    pub config: RunConfig,
    /// Report, or the error that stopped the run.
    pub result: Result<RunReport, PipelineError>,
}

impl RunOutcome {
    /// Whether the run completed.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs returns, factor regression and volatility fits for every fund of a
/// price source and writes per-fund and aggregate outputs.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOrchestrator {
    regions: RegionTable,
    factor_runner: FactorModelRunner,
    volatility_runner: VolatilityModelRunner,
}

impl AnalysisOrchestrator {
    /// Orchestrator with the default region table and model runners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the region table.
    #[must_use]
    pub fn with_regions(mut self, regions: RegionTable) -> Self {
        self.regions = regions;
        self
    }

    /// Replace the volatility runner.
    #[must_use]
    pub fn with_volatility_runner(mut self, runner: VolatilityModelRunner) -> Self {
        self.volatility_runner = runner;
        self
    }

    /// Run one configuration against its CSV sheet directory.
    ///
    /// # Errors
    /// Returns the first `PipelineError` hit; aggregate tables are only
    /// written when every fund succeeds.
    pub fn run(&self, config: &RunConfig) -> Result<RunReport, PipelineError> {
        config.validate()?;
        let source = CsvSheetDirectory::open(&config.fund_price_file, config.sheet_layout)?;
        self.run_with_source(config, &source)
    }

    /// Run one configuration against an arbitrary price source.
    ///
    /// # Errors
    /// See [`Self::run`].
    pub fn run_with_source(
        &self,
        config: &RunConfig,
        source: &dyn PriceSource,
    ) -> Result<RunReport, PipelineError> {
        config.validate()?;

        let profile = self.regions.profile(config.fund_region);
        let factors = load_factors(&config.factor_dir, profile, &config.window())?;
        let head = factor_head(&factors, HEAD_ROWS)?;
        info!(region = %config.fund_region, "factor set first rows\n{head}");
        log_factor_stats(&factors);

        let sheets = source.sheet_names()?;
        if sheets.is_empty() {
            warn!(source = ?config.fund_price_file, "price source has no sheets");
        }

        let output_dir = config.output_dir();
        fs::create_dir_all(&output_dir).map_err(|e| PipelineError::io(&output_dir, e))?;
        info!(
            output = %output_dir.display(),
            region = %config.fund_region,
            returns = %config.returns_type,
            funds = sheets.len(),
            "starting run"
        );

        let return_config = ReturnConfig::new(config.returns_type, config.window())
            .with_gap_limit(config.gap_limit);
        let computer = ReturnComputer::new(return_config);

        let mut run = FundRun::new(output_dir);
        for sheet in &sheets {
            let panel = source.load_sheet(sheet)?;
            let fund = panel.fund().clone();
            info!(
                fund = %fund,
                columns = panel.n_columns(),
                rows = panel.n_dates(),
                "processing fund"
            );
            let head = panel_head(&panel, HEAD_ROWS)?;
            info!(fund = %fund, "price panel first rows\n{head}");

            let returns = computer.compute(&panel)?;
            let stats = describe(returns.values());
            info!(fund = %fund, ?stats, "return statistics");
            run.write(format!("{fund}_daily_returns.png"), |p| plot_returns(p, &returns))?;

            let regression = self
                .factor_runner
                .run(&fund, &returns, &factors)
                .map_err(|source| estimation_error(&fund, source))?;
            run.write_text(format!("ols_summary_{fund}.csv"), &regression.summary)?;

            let volatility = self
                .volatility_runner
                .run(&fund, &returns)
                .map_err(|source| estimation_error(&fund, source))?;
            for result in volatility.iter() {
                let prefix = result.kind.prefix();
                run.write_text(format!("{prefix}_summary_{fund}.csv"), &result.summary)?;
                run.write(format!("{prefix}_{fund}.png"), |p| plot_volatility(p, &result.fit))?;
            }

            run.stats.append(&fund, &stats);
            run.coefficients.append(&fund, &regression);
            run.p_values.append(&fund, &regression);
            run.garch.append(&fund, &volatility.garch);
            run.arx.append(&fund, &volatility.arx);
            run.funds.push(fund);
        }

        let report = run.finish()?;
        info!(
            output = %report.output_dir.display(),
            funds = report.funds.len(),
            files = report.files.len(),
            "run complete"
        );
        Ok(report)
    }

    /// Run several configurations in order. A failing run is logged and does
    /// not stop the ones after it.
    pub fn run_all(&self, configs: &[RunConfig]) -> Vec<RunOutcome> {
        configs
            .iter()
            .map(|config| {
                let result = self.run(config);
                if let Err(err) = &result {
                    error!(
                        tag = %config.tag,
                        kind = %err.kind(),
                        error = %err,
                        "run failed"
                    );
                }
                RunOutcome { config: config.clone(), result }
            })
            .collect()
    }
}

/// Builders and bookkeeping for one run.
struct FundRun {
    output_dir: PathBuf,
    funds: Vec<FundName>,
    files: Vec<PathBuf>,
    stats: AggregateTableBuilder<DescriptiveStats>,
    coefficients: AggregateTableBuilder<RegressionCoefficients>,
    p_values: AggregateTableBuilder<RegressionPValues>,
    garch: AggregateTableBuilder<VolatilityResult>,
    arx: AggregateTableBuilder<VolatilityResult>,
}

impl FundRun {
    const fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            funds: Vec::new(),
            files: Vec::new(),
            stats: AggregateTableBuilder::new(),
            coefficients: AggregateTableBuilder::new(),
            p_values: AggregateTableBuilder::new(),
            garch: AggregateTableBuilder::new(),
            arx: AggregateTableBuilder::new(),
        }
    }

    fn write(
        &mut self,
        name: String,
        render: impl FnOnce(&Path) -> Result<(), PipelineError>,
    ) -> Result<(), PipelineError> {
        let path = self.output_dir.join(name);
        render(&path)?;
        self.files.push(path);
        Ok(())
    }

    fn write_text(&mut self, name: String, text: &str) -> Result<(), PipelineError> {
        self.write(name, |path| fs::write(path, text).map_err(|e| PipelineError::io(path, e)))
    }

    fn finish(mut self) -> Result<RunReport, PipelineError> {
        let tables = [
            (STATS_TABLE, self.stats.finalize()),
            (OLS_TABLE, self.coefficients.finalize()),
            (OLS_PVALUES_TABLE, self.p_values.finalize()),
            (GARCH_TABLE, self.garch.finalize()),
            (ARX_TABLE, self.arx.finalize()),
        ];
        for (name, table) in tables {
            let path = self.output_dir.join(name);
            table.write_csv(&path)?;
            self.files.push(path);
        }
        Ok(RunReport { output_dir: self.output_dir, funds: self.funds, files: self.files })
    }
}

fn estimation_error(fund: &FundName, source: ModelError) -> PipelineError {
    PipelineError::Estimation { fund: fund.to_string(), source }
}

fn log_factor_stats(factors: &FactorSet) {
    for (j, name) in factors.names().iter().enumerate() {
        let stats = describe(&factors.factor(j).to_vec());
        info!(factor = %name, ?stats, "factor statistics");
    }
    let stats = describe(factors.risk_free());
    info!(factor = "RF", ?stats, "factor statistics");
}
