//! Error types for flowtag.
//!
//! Every pipeline stage fails with its own variants so the caller can tell
//! which input was at fault. All errors implement `std::error::Error` via
//! `thiserror`.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for flowtag operations.
pub type Result<T> = std::result::Result<T, FlowTagError>;

/// Errors that can occur while producing a flow log report.
#[derive(Debug, Error)]
pub enum FlowTagError {
    /// Configuration file does not exist.
    #[error("Configuration file {} not found", path.display())]
    ConfigNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// Configuration file could not be read or decoded.
    #[error("Error decoding the configuration file {}: {message}", path.display())]
    ConfigMalformed {
        /// Configuration file path.
        path: PathBuf,
        /// What was wrong with the content.
        message: String,
    },

    /// A required configuration key is absent.
    #[error("Configuration file {} is missing required key '{key}'", path.display())]
    ConfigIncomplete {
        /// Configuration file path.
        path: PathBuf,
        /// The missing key.
        key: &'static str,
    },

    /// Lookup table file does not exist.
    #[error("Lookup file {} not found", path.display())]
    LookupFileNotFound {
        /// Lookup file path.
        path: PathBuf,
    },

    /// Lookup table header or row lacks a required column.
    #[error(
        "Missing expected column '{column}' in the lookup file {} ({})",
        path.display(),
        describe_row(*row)
    )]
    LookupSchemaError {
        /// Lookup file path.
        path: PathBuf,
        /// The missing column.
        column: &'static str,
        /// 0 for the header, otherwise the 1-based data row.
        row: u64,
    },

    /// Any other failure while reading the lookup table.
    #[error("An error occurred while loading the lookup table {}: {source}", path.display())]
    LookupReadError {
        /// Lookup file path.
        path: PathBuf,
        /// The underlying CSV/IO error.
        #[source]
        source: csv::Error,
    },

    /// Flow log file does not exist.
    #[error("Flow log file {} not found", path.display())]
    FlowLogNotFound {
        /// Flow log path.
        path: PathBuf,
    },

    /// Flow log header or row lacks a required column.
    #[error(
        "Missing expected column '{column}' in the flow log file {} ({})",
        path.display(),
        describe_row(*row)
    )]
    FlowLogSchemaError {
        /// Flow log path.
        path: PathBuf,
        /// The missing column.
        column: &'static str,
        /// 0 for the header, otherwise the 1-based data row.
        row: u64,
    },

    /// Any other failure while reading the flow log.
    #[error("An error occurred while parsing the flow log {}: {source}", path.display())]
    FlowLogReadError {
        /// Flow log path.
        path: PathBuf,
        /// The underlying CSV/IO error.
        #[source]
        source: csv::Error,
    },

    /// Writing the report failed.
    #[error("Error writing output {destination}: {source}")]
    ReportWriteError {
        /// Output file path, or `<stdout>`.
        destination: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },
}

fn describe_row(row: u64) -> String {
    if row == 0 {
        "header".to_string()
    } else {
        format!("data row {}", row)
    }
}

impl FlowTagError {
    /// Creates a lookup read error from anything convertible to a CSV error.
    pub fn lookup_read(path: impl Into<PathBuf>, source: impl Into<csv::Error>) -> Self {
        Self::LookupReadError {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Creates a flow log read error from anything convertible to a CSV error.
    pub fn flow_log_read(path: impl Into<PathBuf>, source: impl Into<csv::Error>) -> Self {
        Self::FlowLogReadError {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Creates a report write error.
    pub fn report_write(destination: impl Into<String>, source: io::Error) -> Self {
        Self::ReportWriteError {
            destination: destination.into(),
            source,
        }
    }

    /// Pipeline stage the error belongs to, used as a log field.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::ConfigNotFound { .. }
            | Self::ConfigMalformed { .. }
            | Self::ConfigIncomplete { .. } => "config",
            Self::LookupFileNotFound { .. }
            | Self::LookupSchemaError { .. }
            | Self::LookupReadError { .. } => "lookup",
            Self::FlowLogNotFound { .. }
            | Self::FlowLogSchemaError { .. }
            | Self::FlowLogReadError { .. } => "flow-log",
            Self::ReportWriteError { .. } => "report",
        }
    }
}
