//! Run configuration and job files.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use greenbond_primitives::{Date, DateWindow, Region, ReturnsType};
use greenbond_utils::DEFAULT_GAP_LIMIT;
use serde::{Deserialize, Serialize};

use crate::PipelineError;

/// Header layout of the price sheets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    /// Lines skipped before the header row.
    pub skip_rows: usize,
    /// Lines skipped between the header row and the first data row.
    pub skip_rows_after_header: usize,
}

impl SheetLayout {
    /// Terminal export layout: three banner lines above the header and one
    /// field-code line below it.
    #[must_use]
    pub const fn bloomberg() -> Self {
        Self { skip_rows: 3, skip_rows_after_header: 1 }
    }
}

/// One analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Price source: a directory of `<sheet>.csv` files.
    pub fund_price_file: PathBuf,
    /// Region selecting the factor files.
    pub fund_region: Region,
    /// Return convention.
    pub returns_type: ReturnsType,
    /// Free-form label prefixed to the output directory name.
    pub tag: String,
    /// Directory holding the factor files.
    #[serde(default = "current_dir")]
    pub factor_dir: PathBuf,
    /// Directory under which the run's output directory is created.
    #[serde(default = "current_dir")]
    pub output_root: PathBuf,
    /// First date of the analysis window.
    #[serde(default = "default_window_start")]
    pub window_start: Date,
    /// Last date of the analysis window.
    #[serde(default = "default_window_end")]
    pub window_end: Date,
    /// Maximum consecutive forward fills per price column.
    #[serde(default = "default_gap_limit")]
    pub gap_limit: usize,
    /// Header layout of the price sheets.
    #[serde(default)]
    pub sheet_layout: SheetLayout,
}

fn current_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_window_start() -> Date {
    Date::from_ymd_opt(2013, 1, 1).unwrap_or_default()
}

fn default_window_end() -> Date {
    Date::from_ymd_opt(2017, 12, 31).unwrap_or_default()
}

const fn default_gap_limit() -> usize {
    DEFAULT_GAP_LIMIT
}

impl RunConfig {
    /// Configuration with default directories, window and gap limit.
    pub fn new(
        fund_price_file: impl Into<PathBuf>,
        fund_region: Region,
        returns_type: ReturnsType,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            fund_price_file: fund_price_file.into(),
            fund_region,
            returns_type,
            tag: tag.into(),
            factor_dir: current_dir(),
            output_root: current_dir(),
            window_start: default_window_start(),
            window_end: default_window_end(),
            gap_limit: DEFAULT_GAP_LIMIT,
            sheet_layout: SheetLayout::default(),
        }
    }

    /// Set the factor directory.
    #[must_use]
    pub fn with_factor_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.factor_dir = dir.into();
        self
    }

    /// Set the output root.
    #[must_use]
    pub fn with_output_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_root = dir.into();
        self
    }

    /// Set the analysis window.
    #[must_use]
    pub const fn with_window(mut self, start: Date, end: Date) -> Self {
        self.window_start = start;
        self.window_end = end;
        self
    }

    /// Set the gap limit.
    #[must_use]
    pub const fn with_gap_limit(mut self, gap_limit: usize) -> Self {
        self.gap_limit = gap_limit;
        self
    }

    /// Set the sheet layout.
    #[must_use]
    pub const fn with_sheet_layout(mut self, layout: SheetLayout) -> Self {
        self.sheet_layout = layout;
        self
    }

    /// Analysis window.
    #[must_use]
    pub const fn window(&self) -> DateWindow {
        DateWindow::new(self.window_start, self.window_end)
    }

    /// Output directory name, `<tag>_<region>_<returns>_return`.
    #[must_use]
    pub fn output_name(&self) -> String {
        format!("{}_{}_{}_return", self.tag, self.fund_region.label(), self.returns_type.label())
    }

    /// Output directory under the output root.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.output_root.join(self.output_name())
    }

    /// Check the configuration for internal consistency.
    ///
    /// # Errors
    /// Returns `PipelineError::Config` if the window is empty or the tag would
    /// escape the output root.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.window_start > self.window_end {
            return Err(PipelineError::Config(format!(
                "window start {} is after window end {}",
                self.window_start, self.window_end
            )));
        }
        if self.tag.contains(['/', '\\']) {
            return Err(PipelineError::Config(format!(
                "tag {:?} must not contain path separators",
                self.tag
            )));
        }
        Ok(())
    }
}

/// A list of runs, as stored in a JSON job file `{"runs": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobsFile {
    /// Runs, executed in order.
    pub runs: Vec<RunConfig>,
}

impl JobsFile {
    /// Read a job file.
    ///
    /// # Errors
    /// Returns `PipelineError::Io` if the file cannot be opened and
    /// `PipelineError::Config` if it is not a valid job list.
    pub fn from_path(path: &Path) -> Result<Self, PipelineError> {
        let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| PipelineError::Config(format!("{}: {e}", path.display())))
    }
}
