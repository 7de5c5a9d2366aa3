//! Region to factor file mapping.

use std::path::{Path, PathBuf};

use greenbond_primitives::Region;

/// Factor files for one region, relative to the factor directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionProfile {
    /// Three-factor file (with the `RF` column).
    pub factor_file: &'static str,
    /// Preamble lines before the three-factor header.
    pub factor_skip: usize,
    /// Momentum factor file.
    pub momentum_file: &'static str,
    /// Preamble lines before the momentum header.
    pub momentum_skip: usize,
}

impl RegionProfile {
    /// Path of the three-factor file under `dir`.
    #[must_use]
    pub fn factor_path(&self, dir: &Path) -> PathBuf {
        dir.join(self.factor_file)
    }

    /// Path of the momentum file under `dir`.
    #[must_use]
    pub fn momentum_path(&self, dir: &Path) -> PathBuf {
        dir.join(self.momentum_file)
    }
}

/// Fixed lookup from [`Region`] to its factor files.
#[derive(Debug, Clone)]
pub struct RegionTable {
    eu: RegionProfile,
    us: RegionProfile,
    global: RegionProfile,
}

impl Default for RegionTable {
    fn default() -> Self {
        Self {
            eu: RegionProfile {
                factor_file: "Europe_3_Factors_Daily.csv",
                factor_skip: 6,
                momentum_file: "Europe_MOM_Factor_Daily.csv",
                momentum_skip: 6,
            },
            us: RegionProfile {
                factor_file: "F-F_Research_Data_Factors_daily.CSV",
                factor_skip: 4,
                momentum_file: "F-F_Momentum_Factor_daily.CSV",
                momentum_skip: 13,
            },
            global: RegionProfile {
                factor_file: "Global_3_Factors_Daily.csv",
                factor_skip: 6,
                momentum_file: "Global_MOM_Factor_Daily.csv",
                momentum_skip: 6,
            },
        }
    }
}

impl RegionTable {
    /// Profile for a region.
    #[must_use]
    pub const fn profile(&self, region: Region) -> &RegionProfile {
        match region {
            Region::Eu => &self.eu,
            Region::Us => &self.us,
            Region::Global => &self.global,
        }
    }
}
