//! Fund identifiers.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Name of a fund, taken from the price source sheet it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
pub struct FundName(pub String);

impl FundName {
    /// Create a new fund name.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the fund name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FundName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FundName {
    fn from(s: String) -> Self {
        Self(s)
    }
}
