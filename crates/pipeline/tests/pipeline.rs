//! End-to-end runs over CSV factor files and price sheets.
#![allow(missing_docs)]

use std::{fs, path::Path};

use chrono::{Duration, NaiveDate};
use greenbond_pipeline::{AnalysisOrchestrator, ErrorKind, RunConfig, SheetLayout};
use greenbond_primitives::{Region, ReturnsType};
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};
use tempfile::TempDir;

const DAYS: i64 = 420;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2014, 1, 1).unwrap()
}

fn write_factors(dir: &Path) {
    let mut rng = StdRng::seed_from_u64(11);
    let normal = Normal::new(0.0, 0.6).unwrap();

    let mut three = String::from(
        "This file was created by CMPT_ME_BEME_RETS_DAILY using the 201712 database.\n\
         Daily returns.\n\n\n\nMissing data are indicated by -99.99.\n\
         ,Mkt-RF,SMB,HML,RF\n",
    );
    let mut momentum = String::from("Momentum.\n\n\n\n\n\n,WML\n");
    for i in 0..DAYS {
        let date = (start() + Duration::days(i)).format("%Y%m%d");
        let [m, s, h, w]: [f64; 4] = std::array::from_fn(|_| normal.sample(&mut rng));
        three.push_str(&format!("{date},{m:.4},{s:.4},{h:.4},0.0040\n"));
        momentum.push_str(&format!("{date},{w:.4}\n"));
    }
    three.push_str("\n Copyright 2018 Kenneth R. French\n");
    momentum.push_str("\n Copyright 2018 Kenneth R. French\n");

    fs::write(dir.join("Europe_3_Factors_Daily.csv"), three).unwrap();
    fs::write(dir.join("Europe_MOM_Factor_Daily.csv"), momentum).unwrap();
}

/// Two bond columns driven by a shared GARCH(1,1) shock, one of them with
/// a short gap.
fn write_sheet(dir: &Path, fund: &str, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).unwrap();
    let (mut var, mut eps) = (1e-4_f64, 0.0_f64);
    let (mut a, mut b) = (100.0_f64, 95.0_f64);

    let mut csv = String::from("Dates,Bond A,Bond B,Currency\n");
    for i in 0..DAYS {
        var = 2e-6 + 0.08 * eps * eps + 0.9 * var;
        eps = var.sqrt() * normal.sample(&mut rng);
        a *= 1.0 + eps;
        b *= 1.0 + 0.8 * eps + 0.001 * normal.sample(&mut rng);
        let date = start() + Duration::days(i);
        let b_cell = if (100..103).contains(&i) { String::new() } else { format!("{b:.6}") };
        csv.push_str(&format!("{date},{a:.6},{b_cell},EUR\n"));
    }
    fs::write(dir.join(format!("{fund}.csv")), csv).unwrap();
}

fn setup() -> (TempDir, RunConfig) {
    let root = TempDir::new().unwrap();
    write_factors(root.path());
    let prices = root.path().join("sri_funds");
    fs::create_dir(&prices).unwrap();
    write_sheet(&prices, "FundB", 2);
    write_sheet(&prices, "FundA", 1);

    let config = RunConfig::new(&prices, Region::Eu, ReturnsType::Simple, "T")
        .with_factor_dir(root.path())
        .with_output_root(root.path().join("out"))
        .with_window(start(), start() + Duration::days(DAYS))
        .with_sheet_layout(SheetLayout::default());
    (root, config)
}

fn count_matching(dir: &Path, pred: impl Fn(&str) -> bool) -> usize {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.unwrap().file_name().into_string().ok())
        .filter(|name| pred(name))
        .count()
}

#[test]
fn writes_the_full_output_set() {
    let (_root, config) = setup();
    let report = AnalysisOrchestrator::new().run(&config).unwrap();

    let out = &report.output_dir;
    assert!(out.ends_with("T_EU_pct_return"));
    assert_eq!(count_matching(out, |n| n.starts_with("greenbond_") && n.ends_with(".csv")), 5);
    assert_eq!(count_matching(out, |n| n.ends_with("_daily_returns.png")), 2);
    assert_eq!(count_matching(out, |n| n.starts_with("ols_summary_")), 2);
    assert_eq!(
        count_matching(out, |n| n.starts_with("garch_summary_") || n.starts_with("arx_summary_")),
        4
    );
    assert_eq!(
        count_matching(out, |n| {
            (n.starts_with("garch_") || n.starts_with("arx_")) && n.ends_with(".png")
        }),
        4
    );
    assert_eq!(count_matching(out, |_| true), 17);
}

#[test]
fn aggregate_columns_follow_sheet_order() {
    let (_root, config) = setup();
    let report = AnalysisOrchestrator::new().run(&config).unwrap();

    for table in ["greenbond_stats.csv", "greenbond_ols.csv", "greenbond_garch.csv"] {
        let text = fs::read_to_string(report.output_dir.join(table)).unwrap();
        assert_eq!(text.lines().next(), Some("field,FundA,FundB"), "{table}");
    }

    let ols = fs::read_to_string(report.output_dir.join("greenbond_ols.csv")).unwrap();
    let fields: Vec<&str> = ols.lines().skip(1).filter_map(|l| l.split(',').next()).collect();
    assert_eq!(fields, ["const", "Mkt-RF", "SMB", "HML", "WML"]);

    let arx = fs::read_to_string(report.output_dir.join("greenbond_arx.csv")).unwrap();
    let fields: Vec<&str> = arx.lines().skip(1).filter_map(|l| l.split(',').next()).collect();
    assert_eq!(fields, ["Const", "y[1]", "omega", "alpha[1]", "beta[1]"]);
}

#[test]
fn identical_runs_write_identical_tables() {
    let (_root, config) = setup();
    let orchestrator = AnalysisOrchestrator::new();

    let first = orchestrator.run(&config).unwrap();
    let snapshot: Vec<Vec<u8>> = first
        .files
        .iter()
        .filter(|f| f.extension().is_some_and(|e| e == "csv"))
        .map(|f| fs::read(f).unwrap())
        .collect();

    let second = orchestrator.run(&config).unwrap();
    let again: Vec<Vec<u8>> = second
        .files
        .iter()
        .filter(|f| f.extension().is_some_and(|e| e == "csv"))
        .map(|f| fs::read(f).unwrap())
        .collect();

    assert_eq!(first.files, second.files);
    assert_eq!(snapshot, again);
}

#[test]
fn run_all_continues_after_a_failure() {
    let (root, config) = setup();
    let missing = RunConfig { fund_price_file: root.path().join("nowhere"), ..config.clone() };
    let log = RunConfig { returns_type: ReturnsType::Log, ..config.clone() };

    let outcomes = AnalysisOrchestrator::new().run_all(&[missing, log, config]);

    assert_eq!(outcomes.len(), 3);
    let err = outcomes[0].result.as_ref().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(outcomes[1].is_ok());
    assert!(outcomes[2].is_ok());
    assert!(root.path().join("out").join("T_EU_log_return").is_dir());
    assert!(root.path().join("out").join("T_EU_pct_return").is_dir());
}

#[test]
fn sheet_without_numeric_columns_aborts_the_run() {
    let (root, config) = setup();
    let prices = root.path().join("sri_funds");
    fs::write(prices.join("AAA.csv"), "Dates,Name\n2014-01-02,x\n2014-01-03,y\n").unwrap();

    let err = AnalysisOrchestrator::new().run(&config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataShape);
    assert!(!config.output_dir().join("greenbond_stats.csv").exists());
}
