//! Error types for utility functions.

use greenbond_primitives::SeriesError;

/// Errors that can occur during utility operations.
#[derive(Debug, thiserror::Error)]
pub enum UtilsError {
    /// Series construction error.
    #[error("series error: {0}")]
    Series(#[from] SeriesError),
}
