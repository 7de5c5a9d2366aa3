#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/greenbond-analytics/greenbond/issues/")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(feature = "primitives")]
#[doc(inline)]
pub use greenbond_primitives as primitives;
#[cfg(feature = "traits")]
#[doc(inline)]
pub use greenbond_traits as traits;
#[cfg(feature = "math")]
#[doc(inline)]
pub use greenbond_math as math;
#[cfg(feature = "model")]
#[doc(inline)]
pub use greenbond_model as model;
#[cfg(feature = "utils")]
#[doc(inline)]
pub use greenbond_utils as utils;
#[cfg(feature = "pipeline")]
#[doc(inline)]
pub use greenbond_pipeline as pipeline;
