//! Green bond fund analysis CLI.
//!
//! Runs the factor regression and volatility pipeline for one configuration
//! given by flags, or for every run in a JSON job file.
//!
//! Usage:
//! `greenbond --prices DIR --region EU --returns pct --tag green [--factor-dir DIR]`
//! `greenbond --jobs runs.json`

use std::{error::Error, path::PathBuf, process};

use chrono::NaiveDate;
use clap::Parser;
use greenbond::{
    pipeline::{AnalysisOrchestrator, JobsFile, RunConfig, SheetLayout},
    primitives::{Region, ReturnsType},
    utils::DEFAULT_GAP_LIMIT,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "greenbond")]
#[command(about = "Green bond fund factor and volatility analysis", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON job file `{"runs": [...]}`; replaces the single-run flags
    #[arg(long, conflicts_with_all = ["prices", "region", "returns", "tag"])]
    jobs: Option<PathBuf>,

    /// Directory of `<fund>.csv` price sheets
    #[arg(long, required_unless_present = "jobs")]
    prices: Option<PathBuf>,

    /// Factor region: EU, US or Global
    #[arg(long, required_unless_present = "jobs")]
    region: Option<Region>,

    /// Return convention: pct, cum or log
    #[arg(long, required_unless_present = "jobs")]
    returns: Option<ReturnsType>,

    /// Label prefixed to the output directory
    #[arg(long, required_unless_present = "jobs")]
    tag: Option<String>,

    /// Directory holding the factor files
    #[arg(long, default_value = ".")]
    factor_dir: PathBuf,

    /// Directory the run output directory is created under
    #[arg(long, default_value = ".")]
    output_root: PathBuf,

    /// First date of the analysis window (YYYY-MM-DD)
    #[arg(long)]
    window_start: Option<NaiveDate>,

    /// Last date of the analysis window (YYYY-MM-DD)
    #[arg(long)]
    window_end: Option<NaiveDate>,

    /// Maximum consecutive forward fills per price column
    #[arg(long, default_value_t = DEFAULT_GAP_LIMIT)]
    gap_limit: usize,

    /// Sheets have three banner lines above the header and a field-code line below it
    #[arg(long)]
    bloomberg_layout: bool,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn run_configs(&self) -> Result<Vec<RunConfig>, Box<dyn Error>> {
        if let Some(jobs) = &self.jobs {
            return Ok(JobsFile::from_path(jobs)?.runs);
        }

        let (Some(prices), Some(region), Some(returns), Some(tag)) =
            (&self.prices, self.region, self.returns, &self.tag)
        else {
            return Err("--prices, --region, --returns and --tag are required".into());
        };

        let mut config = RunConfig::new(prices, region, returns, tag.as_str())
            .with_factor_dir(&self.factor_dir)
            .with_output_root(&self.output_root)
            .with_gap_limit(self.gap_limit);
        if self.window_start.is_some() || self.window_end.is_some() {
            let start = self.window_start.unwrap_or(config.window_start);
            let end = self.window_end.unwrap_or(config.window_end);
            config = config.with_window(start, end);
        }
        if self.bloomberg_layout {
            config = config.with_sheet_layout(SheetLayout::bloomberg());
        }
        Ok(vec![config])
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn run(cli: &Cli) -> Result<bool, Box<dyn Error>> {
    let configs = cli.run_configs()?;
    info!(runs = configs.len(), "loaded run configuration");

    let outcomes = AnalysisOrchestrator::new().run_all(&configs);
    let mut all_ok = true;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(report) => println!(
                "{}: {} funds, {} files in {}",
                outcome.config.output_name(),
                report.funds.len(),
                report.files.len(),
                report.output_dir.display()
            ),
            Err(err) => {
                all_ok = false;
                eprintln!("{}: {} error: {err}", outcome.config.output_name(), err.kind());
            }
        }
    }
    Ok(all_ok)
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(2);
        }
    }
}
