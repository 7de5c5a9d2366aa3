#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/greenbond-analytics/greenbond/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod config;
pub use config::{JobsFile, RunConfig, SheetLayout};

mod region;
pub use region::{RegionProfile, RegionTable};

mod loader;
pub use loader::{CsvSheetDirectory, PriceSource, load_factors};

mod table;
pub use table::{
    AggregateTable, AggregateTableBuilder, RegressionCoefficients, RegressionPValues, TableRow,
};

mod preview;

mod plot;
pub use plot::{plot_returns, plot_volatility};

mod orchestrator;
pub use orchestrator::{AnalysisOrchestrator, RunOutcome, RunReport};

mod error;
pub use error::{ErrorKind, PipelineError};

