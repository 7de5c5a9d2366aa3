//! Example: End-to-End Run on Synthetic Data
//!
//! Builds a throwaway data directory with:
//! 1. EU Fama-French style factor and momentum files
//! 2. Three fund price sheets driven by simulated GARCH(1,1) shocks
//!
//! then runs the full pipeline for every return convention and prints the
//! aggregate tables.
//!
//! Run with: `cargo run --example synthetic_run`

use std::{error::Error, fs, path::Path};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use greenbond::{
    pipeline::{AnalysisOrchestrator, RunConfig},
    primitives::{Region, ReturnsType},
};
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Calendar days of synthetic history.
const CALENDAR_DAYS: i64 = 900;

/// Funds as (name, market beta, number of bonds).
const FUNDS: &[(&str, f64, usize)] =
    &[("Amundi_Green", 0.35, 3), ("iShares_Green", 0.5, 4), ("Lyxor_Green", 0.2, 2)];

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let workspace = tempfile::tempdir()?;
    let root = workspace.path();
    let prices = root.join("sri_funds");
    fs::create_dir(&prices)?;

    let market = write_factor_files(root)?;
    for (i, (name, beta, bonds)) in FUNDS.iter().enumerate() {
        write_fund_sheet(&prices, name, *beta, *bonds, &market, 100 + i as u64)?;
    }

    let start = first_day();
    let configs: Vec<RunConfig> = ReturnsType::ALL
        .iter()
        .map(|&returns| {
            RunConfig::new(&prices, Region::Eu, returns, "demo")
                .with_factor_dir(root)
                .with_output_root(root.join("results"))
                .with_window(start, start + Duration::days(CALENDAR_DAYS))
        })
        .collect();

    let outcomes = AnalysisOrchestrator::new().run_all(&configs);
    for outcome in &outcomes {
        print_outcome(outcome.config.output_name(), &outcome.result)?;
    }
    Ok(())
}

// ============================================================================
// SYNTHETIC DATA
// ============================================================================

fn first_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2014, 1, 1).unwrap_or_default()
}

fn business_days() -> Vec<NaiveDate> {
    (0..CALENDAR_DAYS)
        .map(|i| first_day() + Duration::days(i))
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .collect()
}

/// Write the factor files and return the daily market excess return.
fn write_factor_files(dir: &Path) -> Result<Vec<f64>, Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(7);
    let noise = Normal::new(0.0, 0.5)?;
    let preamble = "This file was created using the 201712 database.\n\n\n\n\n\n";

    let mut three = format!("{preamble},Mkt-RF,SMB,HML,RF\n");
    let mut momentum = format!("{preamble},WML\n");
    let mut market = Vec::new();
    for day in business_days() {
        let date = day.format("%Y%m%d");
        let mkt: f64 = noise.sample(&mut rng) * 1.6;
        let (smb, hml, wml): (f64, f64, f64) =
            (noise.sample(&mut rng), noise.sample(&mut rng), noise.sample(&mut rng));
        three.push_str(&format!("{date},{mkt:.2},{smb:.2},{hml:.2},0.00\n"));
        momentum.push_str(&format!("{date},{wml:.2}\n"));
        market.push(mkt / 100.0);
    }
    three.push_str("\nCopyright 2018 Kenneth R. French\n");

    fs::write(dir.join("Europe_3_Factors_Daily.csv"), three)?;
    fs::write(dir.join("Europe_MOM_Factor_Daily.csv"), momentum)?;
    Ok(market)
}

/// Write one fund sheet; every fifth bond misses a few quotes.
fn write_fund_sheet(
    dir: &Path,
    fund: &str,
    beta: f64,
    bonds: usize,
    market: &[f64],
    seed: u64,
) -> Result<(), Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let shock = Normal::new(0.0, 1.0)?;
    let (mut var, mut eps) = (4e-6_f64, 0.0_f64);
    let mut levels = vec![100.0_f64; bonds];

    let header: Vec<String> = (0..bonds).map(|b| format!("{fund} Bond {b}")).collect();
    let mut csv = format!("Date,{}\n", header.join(","));
    for (i, day) in business_days().iter().enumerate() {
        var = 1e-7 + 0.1 * eps * eps + 0.85 * var;
        eps = var.sqrt() * shock.sample(&mut rng);
        let cells: Vec<String> = levels
            .iter_mut()
            .enumerate()
            .map(|(b, level)| {
                *level *= 1.0 + beta * market[i] + eps + 1e-4 * shock.sample(&mut rng);
                if b % 5 == 4 && i % 97 < 3 { String::new() } else { format!("{level:.4}") }
            })
            .collect();
        csv.push_str(&format!("{},{}\n", day.format("%Y-%m-%d"), cells.join(",")));
    }
    fs::write(dir.join(format!("{fund}.csv")), csv)?;
    Ok(())
}

// ============================================================================
// OUTPUT
// ============================================================================

fn print_outcome(
    name: String,
    result: &Result<greenbond::pipeline::RunReport, greenbond::pipeline::PipelineError>,
) -> std::io::Result<()> {
    println!("\n{}", "=".repeat(72));
    println!("{name}");
    println!("{}", "=".repeat(72));

    let report = match result {
        Ok(report) => report,
        Err(err) => {
            println!("failed ({}): {err}", err.kind());
            return Ok(());
        }
    };

    println!("{} funds, {} files", report.funds.len(), report.files.len());
    for table in ["greenbond_ols.csv", "greenbond_ols_pvalues.csv", "greenbond_garch.csv"] {
        println!("\n{table}");
        print!("{}", fs::read_to_string(report.output_dir.join(table))?);
    }
    Ok(())
}
