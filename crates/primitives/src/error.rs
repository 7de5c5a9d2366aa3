//! Error types for core data structures.

use crate::Date;

/// Errors raised when constructing series, panels or factor sets.
#[derive(Debug, thiserror::Error)]
pub enum SeriesError {
    /// Dates are not strictly increasing.
    #[error("dates not strictly increasing: {previous} followed by {next}")]
    NotIncreasing {
        /// Earlier date.
        previous: Date,
        /// Offending date.
        next: Date,
    },

    /// Dates and values differ in length.
    #[error("length mismatch: {dates} dates, {values} values")]
    LengthMismatch {
        /// Number of dates.
        dates: usize,
        /// Number of values.
        values: usize,
    },

    /// Column names and matrix width differ.
    #[error("column mismatch: {names} names, {columns} columns")]
    ColumnMismatch {
        /// Number of column names.
        names: usize,
        /// Number of matrix columns.
        columns: usize,
    },

    /// Panel has no numeric columns.
    #[error("no numeric columns for {0}")]
    NoColumns(String),

    /// Unrecognised selector value.
    #[error("unknown {kind}: {value}")]
    UnknownVariant {
        /// Selector being parsed.
        kind: &'static str,
        /// Rejected input.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SeriesError::LengthMismatch { dates: 3, values: 4 };
        assert_eq!(err.to_string(), "length mismatch: 3 dates, 4 values");

        let err = SeriesError::UnknownVariant { kind: "region", value: "Asia".to_string() };
        assert!(err.to_string().contains("Asia"));
    }
}
