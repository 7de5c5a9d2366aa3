#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/greenbond-analytics/greenbond/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod transform;
pub use transform::ReturnTransform;

mod estimator;
pub use estimator::{EstimatorError, RegressionEngine, VolatilityEngine};
