#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/greenbond-analytics/greenbond/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
pub use error::SeriesError;

mod factor;
pub use factor::{FactorName, FactorSet};

mod fund;
pub use fund::FundName;

mod panel;
pub use panel::FundPricePanel;

mod results;
pub use results::{
    ParameterEstimate, RegressionFit, RegressionResult, VolatilityFit, VolatilityModelKind,
    VolatilityResult,
};

mod selector;
pub use selector::{DateWindow, Region, ReturnsType};

mod series;
pub use series::DateIndexedSeries;

/// Re-export common date type.
pub type Date = chrono::NaiveDate;
