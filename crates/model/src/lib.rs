#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/greenbond-analytics/greenbond/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

// Vec<f64> arithmetic backend for the argmin solvers
use argmin_math as _;

mod ols;
pub use ols::{MissingPolicy, OlsConfig, OlsEngine};

mod garch;
pub use garch::{GarchConfig, GarchEngine, MeanModel};

mod factor_model;
pub use factor_model::{FactorDesign, FactorModelRunner, INTERCEPT};

mod volatility;
pub use volatility::{VolatilityModelRunner, VolatilityResults};

mod summary;
pub use summary::{regression_summary, volatility_summary};

mod error;
pub use error::ModelError;

/// Re-export commonly used types.
pub mod prelude {
    pub use greenbond_traits::{RegressionEngine, VolatilityEngine};

    pub use super::{
        FactorModelRunner, GarchEngine, ModelError, OlsEngine, VolatilityModelRunner,
    };
}
