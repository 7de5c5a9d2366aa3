//! Error types for the analysis pipeline.

use std::{fmt, path::PathBuf};

use greenbond_model::ModelError;
use greenbond_primitives::SeriesError;
use greenbond_utils::UtilsError;

/// Broad classification of pipeline failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input data has the wrong shape or content.
    DataShape,
    /// A model could not be estimated.
    Estimation,
    /// A file could not be read or written.
    Io,
    /// The run configuration is invalid.
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::DataShape => "data shape",
            Self::Estimation => "estimation",
            Self::Io => "io",
            Self::Config => "config",
        };
        f.write_str(s)
    }
}

/// Errors that can occur while running the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Unusable input data.
    #[error("data shape error: {0}")]
    DataShape(String),

    /// Series construction error.
    #[error("series error: {0}")]
    Series(#[from] SeriesError),

    /// Return computation error.
    #[error("return computation error: {0}")]
    Returns(#[from] UtilsError),

    /// Model estimation failed for a fund.
    #[error("estimation failed for {fund}: {source}")]
    Estimation {
        /// Fund being processed.
        fund: String,
        /// Underlying model error.
        source: ModelError,
    },

    /// Filesystem error.
    #[error("io error at {}: {source}", path.display())]
    Io {
        /// Path involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Factor file parse error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Price sheet or table error.
    #[error("data frame error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Plot rendering error.
    #[error("plot error: {0}")]
    Plot(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl PipelineError {
    /// Wrap an IO error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DataShape(_)
            | Self::Series(_)
            | Self::Returns(_)
            | Self::Csv(_)
            | Self::Polars(_) => ErrorKind::DataShape,
            Self::Estimation { .. } => ErrorKind::Estimation,
            Self::Io { .. } | Self::Plot(_) => ErrorKind::Io,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds() {
        let err = PipelineError::DataShape("no numeric columns".to_string());
        assert_eq!(err.kind(), ErrorKind::DataShape);
        assert!(err.to_string().contains("no numeric columns"));

        let err = PipelineError::io(
            "/missing/prices",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("/missing/prices"));

        let err = PipelineError::Estimation {
            fund: "FundA".to_string(),
            source: ModelError::InvalidConfig("lags".to_string()),
        };
        assert_eq!(err.kind(), ErrorKind::Estimation);
        assert!(err.to_string().starts_with("estimation failed for FundA"));

        assert_eq!(PipelineError::Config("window".into()).kind(), ErrorKind::Config);
    }
}
