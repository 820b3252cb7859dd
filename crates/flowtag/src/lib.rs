//! Flow log tagging and reporting
//!
//! Classifies network flow log records against a static (port, protocol)
//! lookup table and reports two aggregates: records per tag and records per
//! distinct (port, protocol) pair.
//!
//! - [`config`]: JSON configuration naming the input and output files
//! - [`lookup`]: CSV lookup table loader
//! - [`aggregator`]: single-pass flow log counting
//! - [`report`]: fixed-width report rendering to a file or stdout
//! - [`pipeline`]: the two entry points chaining the stages
//!
//! Keys are matched case-insensitively after trimming; records without a
//! lookup entry are counted under [`UNTAGGED`].
//!
//! # Example
//!
//! ```ignore
//! use flowtag::{pipeline, Config};
//!
//! let config = Config::load("config.json")?;
//! pipeline::run_to_file(&config)?;
//! ```

pub mod aggregator;
pub mod config;
mod csv_input;
pub mod error;
pub mod lookup;
pub mod pipeline;
pub mod report;
pub mod types;

pub use aggregator::Aggregator;
pub use config::{Config, DEFAULT_CONFIG_FILE};
pub use error::{FlowTagError, Result};
pub use lookup::LookupTable;
pub use report::{render_report, ReportLayout};
pub use types::{LookupKey, PortProtocolCounts, TagCounts, UNTAGGED};
