//! Factor file and price sheet loading.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use greenbond_primitives::{Date, DateWindow, FactorName, FactorSet, FundName, FundPricePanel};
use greenbond_utils::common_index;
use ndarray::Array2;
use polars::prelude::*;
use tracing::{debug, info, warn};

use crate::{PipelineError, RegionProfile, SheetLayout};

/// Name of the risk-free column in the three-factor file.
const RISK_FREE: &str = "RF";

/// Date formats accepted in price sheets, tried in order.
const SHEET_DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y%m%d", "%d/%m/%Y", "%m/%d/%Y"];

/// Raw contents of a factor file, in percentage points.
#[derive(Debug, Clone)]
pub(crate) struct FactorTable {
    dates: Vec<Date>,
    names: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl FactorTable {
    fn column(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    fn row(&self, date: Date) -> Option<&[f64]> {
        self.dates.binary_search(&date).ok().map(|i| self.values[i].as_slice())
    }
}

/// Read a Fama-French style daily factor file.
///
/// `skip` preamble lines are dropped, the next line is the header, and rows
/// are read until the first one whose leading field is not a `YYYYMMDD` date.
///
/// # Errors
/// Returns `PipelineError::Io` if the file cannot be read and
/// `PipelineError::DataShape` if it has no factor columns, no dated rows or
/// dates out of order.
pub(crate) fn read_factor_table(path: &Path, skip: usize) -> Result<FactorTable, PipelineError> {
    let text = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
    let body = text.lines().skip(skip).collect::<Vec<_>>().join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let names: Vec<String> = reader.headers()?.iter().skip(1).map(str::to_string).collect();
    if names.is_empty() {
        return Err(PipelineError::DataShape(format!(
            "{}: no factor columns after {skip} preamble lines",
            path.display()
        )));
    }

    let mut dates = Vec::new();
    let mut values = Vec::new();
    for record in reader.records() {
        let record = record?;
        let Some(date) =
            record.get(0).and_then(|f| NaiveDate::parse_from_str(f, "%Y%m%d").ok())
        else {
            break;
        };
        let row = (1..=names.len())
            .map(|i| record.get(i).and_then(|f| f.parse::<f64>().ok()).unwrap_or(f64::NAN))
            .collect::<Vec<_>>();
        dates.push(date);
        values.push(row);
    }

    if dates.is_empty() {
        return Err(PipelineError::DataShape(format!("{}: no dated rows", path.display())));
    }
    if let Some(w) = dates.windows(2).find(|w| w[1] <= w[0]) {
        return Err(PipelineError::DataShape(format!(
            "{}: dates out of order at {}",
            path.display(),
            w[1]
        )));
    }

    debug!(path = %path.display(), rows = dates.len(), columns = ?names, "read factor file");
    Ok(FactorTable { dates, names, values })
}

/// Load a region's factors: the three-factor file without `RF`, then the
/// momentum columns, with `RF` as the risk-free rate.
///
/// Both files are intersected on date, divided by 100 and restricted to
/// `window`.
///
/// # Errors
/// Returns `PipelineError::Io` if a file cannot be read and
/// `PipelineError::DataShape` if the layout is unusable or `RF` is missing.
pub fn load_factors(
    dir: &Path,
    profile: &RegionProfile,
    window: &DateWindow,
) -> Result<FactorSet, PipelineError> {
    let three = read_factor_table(&profile.factor_path(dir), profile.factor_skip)?;
    let momentum = read_factor_table(&profile.momentum_path(dir), profile.momentum_skip)?;

    let rf = three.column(RISK_FREE).ok_or_else(|| {
        PipelineError::DataShape(format!("{}: missing {RISK_FREE} column", profile.factor_file))
    })?;

    let index = common_index(&[&three.dates, &momentum.dates]);
    let three_cols: Vec<usize> = (0..three.names.len()).filter(|&j| j != rf).collect();
    let n_factors = three_cols.len() + momentum.names.len();

    let mut values = Array2::from_elem((index.len(), n_factors), f64::NAN);
    let mut risk_free = Vec::with_capacity(index.len());
    for (i, &date) in index.iter().enumerate() {
        let (Some(a), Some(b)) = (three.row(date), momentum.row(date)) else {
            continue;
        };
        let row = three_cols.iter().map(|&j| a[j]).chain(b.iter().copied());
        for (j, v) in row.enumerate() {
            values[[i, j]] = v / 100.0;
        }
        risk_free.push(a[rf] / 100.0);
    }

    let names = three_cols
        .iter()
        .map(|&j| three.names[j].clone())
        .chain(momentum.names.iter().cloned())
        .map(FactorName)
        .collect();

    let factors = FactorSet::new(index, names, values, risk_free)?.window(window);
    if factors.is_empty() {
        warn!(dir = %dir.display(), "no factor observations inside the analysis window");
    }
    info!(
        rows = factors.len(),
        factors = ?factors.names().iter().map(ToString::to_string).collect::<Vec<_>>(),
        "loaded factors"
    );
    Ok(factors)
}

/// Source of fund price sheets.
pub trait PriceSource {
    /// Sheet names in processing order.
    ///
    /// # Errors
    /// Returns `PipelineError` if the source cannot be listed.
    fn sheet_names(&self) -> Result<Vec<String>, PipelineError>;

    /// Load one sheet as a price panel.
    ///
    /// # Errors
    /// Returns `PipelineError` if the sheet cannot be read or has no usable
    /// numeric columns.
    fn load_sheet(&self, sheet: &str) -> Result<FundPricePanel, PipelineError>;
}

/// A directory of `<sheet>.csv` files, listed in file-name order.
#[derive(Debug, Clone)]
pub struct CsvSheetDirectory {
    dir: PathBuf,
    layout: SheetLayout,
}

impl CsvSheetDirectory {
    /// Open a sheet directory.
    ///
    /// # Errors
    /// Returns `PipelineError::Io` if `dir` is not a readable directory.
    pub fn open(dir: impl Into<PathBuf>, layout: SheetLayout) -> Result<Self, PipelineError> {
        let dir = dir.into();
        let meta = fs::metadata(&dir).map_err(|e| PipelineError::io(&dir, e))?;
        if !meta.is_dir() {
            return Err(PipelineError::io(
                &dir,
                std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
            ));
        }
        Ok(Self { dir, layout })
    }

    /// Directory path.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn sheet_path(&self, sheet: &str) -> PathBuf {
        self.dir.join(format!("{sheet}.csv"))
    }

    fn read_frame(&self, path: &Path) -> Result<DataFrame, PipelineError> {
        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_skip_rows(self.layout.skip_rows)
            .with_skip_rows_after_header(self.layout.skip_rows_after_header)
            .with_infer_schema_length(Some(10_000))
            .map_parse_options(|opts| opts.with_truncate_ragged_lines(true))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;
        Ok(frame)
    }
}

impl PriceSource for CsvSheetDirectory {
    fn sheet_names(&self) -> Result<Vec<String>, PipelineError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| PipelineError::io(&self.dir, e))?;
        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| PipelineError::io(&self.dir, e))?.path();
            let is_csv = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if path.is_file() && is_csv {
                files.push(path);
            }
        }
        files.sort();

        Ok(files
            .iter()
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect())
    }

    fn load_sheet(&self, sheet: &str) -> Result<FundPricePanel, PipelineError> {
        let path = self.sheet_path(sheet);
        if !path.is_file() {
            return Err(PipelineError::io(
                &path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "sheet not found"),
            ));
        }
        let frame = self.read_frame(&path)?;
        panel_from_frame(sheet, &frame)
    }
}

/// Build a price panel from a sheet frame whose first column holds dates.
fn panel_from_frame(sheet: &str, frame: &DataFrame) -> Result<FundPricePanel, PipelineError> {
    let Some((date_col, rest)) = frame.get_columns().split_first() else {
        return Err(PipelineError::DataShape(format!("sheet {sheet} is empty")));
    };

    let dates: Vec<Option<Date>> = date_col
        .cast(&DataType::String)?
        .str()?
        .into_iter()
        .map(|v| v.and_then(parse_sheet_date))
        .collect();

    let numeric: Vec<&Column> = rest.iter().filter(|c| is_numeric(c.dtype())).collect();
    if numeric.is_empty() {
        return Err(PipelineError::DataShape(format!("sheet {sheet} has no numeric columns")));
    }
    let skipped = rest.len() - numeric.len();
    if skipped > 0 {
        debug!(sheet, skipped, "ignoring non-numeric columns");
    }

    let mut columns = Vec::with_capacity(numeric.len());
    for column in &numeric {
        let values: Vec<f64> = column
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        columns.push(values);
    }

    // Keep dated rows, sorted by date
    let mut rows: Vec<(Date, usize)> =
        dates.iter().enumerate().filter_map(|(i, d)| d.map(|d| (d, i))).collect();
    let dropped = dates.len() - rows.len();
    if dropped > 0 {
        debug!(sheet, dropped, "dropping rows without a parsable date");
    }
    if rows.is_empty() {
        return Err(PipelineError::DataShape(format!("sheet {sheet} has no dated rows")));
    }
    rows.sort_by_key(|(d, _)| *d);
    if let Some(w) = rows.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(PipelineError::DataShape(format!(
            "sheet {sheet} has duplicate date {}",
            w[0].0
        )));
    }

    let prices = Array2::from_shape_fn((rows.len(), columns.len()), |(i, j)| columns[j][rows[i].1]);
    let names = numeric.iter().map(|c| c.name().to_string()).collect();
    let dates = rows.iter().map(|(d, _)| *d).collect();

    Ok(FundPricePanel::new(FundName::new(sheet), dates, names, prices)?)
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64 | DataType::Float32 | DataType::Int64 | DataType::Int32
            | DataType::UInt64 | DataType::UInt32
    )
}

fn parse_sheet_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    SHEET_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}
