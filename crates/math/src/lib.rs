#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/greenbond-analytics/greenbond/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod describe;
pub use describe::{DescriptiveStats, describe};

mod distribution;
pub use distribution::{normal_p_value, student_t_p_value};

mod linalg;
pub use linalg::{LeastSquaresResult, invert_matrix, least_squares, solve_linear_system};

mod optimize;
pub use optimize::numerical_hessian;

mod error;
pub use error::MathError;
