#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/greenbond-analytics/greenbond/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod align;
pub use align::{align_series, align_with_factors, common_index};

mod fill;
pub use fill::{backward_fill, forward_fill, pct_change};

mod returns;
pub use returns::{DEFAULT_GAP_LIMIT, ReturnComputer, ReturnConfig};

mod error;
pub use error::UtilsError;
