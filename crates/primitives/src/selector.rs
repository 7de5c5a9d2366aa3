//! Run selectors: fund region, return convention and date window.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Date, SeriesError};

/// Fund region, selecting which factor files are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    /// European factors.
    #[serde(rename = "EU")]
    Eu,
    /// US factors.
    #[serde(rename = "US")]
    Us,
    /// Global (developed markets) factors.
    #[serde(rename = "Global")]
    Global,
}

impl Region {
    /// All regions.
    pub const ALL: [Self; 3] = [Self::Eu, Self::Us, Self::Global];

    /// Label used in output directory names.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Eu => "EU",
            Self::Us => "US",
            Self::Global => "Global",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Region {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eu" | "europe" => Ok(Self::Eu),
            "us" | "usa" => Ok(Self::Us),
            "global" => Ok(Self::Global),
            _ => Err(SeriesError::UnknownVariant { kind: "region", value: s.to_string() }),
        }
    }
}

/// Return computation convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturnsType {
    /// Period-over-period fractional change.
    #[serde(rename = "pct")]
    Simple,
    /// Compounded running return.
    #[serde(rename = "cum")]
    Cumulative,
    /// Natural log of one plus the fractional change.
    #[serde(rename = "log")]
    Log,
}

impl ReturnsType {
    /// All conventions.
    pub const ALL: [Self; 3] = [Self::Simple, Self::Cumulative, Self::Log];

    /// Short label used in configuration and output directory names.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Simple => "pct",
            Self::Cumulative => "cum",
            Self::Log => "log",
        }
    }
}

impl fmt::Display for ReturnsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReturnsType {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pct" | "simple" => Ok(Self::Simple),
            "cum" | "cumulative" => Ok(Self::Cumulative),
            "log" => Ok(Self::Log),
            _ => Err(SeriesError::UnknownVariant { kind: "returns type", value: s.to_string() }),
        }
    }
}

/// Inclusive date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    /// First date kept.
    pub start: Date,
    /// Last date kept.
    pub end: Date,
}

impl DateWindow {
    /// Create a new window.
    #[must_use]
    pub const fn new(start: Date, end: Date) -> Self {
        Self { start, end }
    }

    /// Whether `date` falls inside the window.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}
