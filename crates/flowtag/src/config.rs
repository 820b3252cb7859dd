//! Configuration file support for flowtag
//!
//! Loads the three input/output paths from a JSON file:
//!
//! ```json
//! {
//!   "lookup_file": "lookup.csv",
//!   "flow_log_file": "flow_logs.csv",
//!   "output_file": "output.txt"
//! }
//! ```
//!
//! All keys are required and have no defaults. Unknown keys are ignored.

use crate::error::{FlowTagError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Default configuration file, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Required keys, checked in this order.
const REQUIRED_KEYS: [&str; 3] = ["lookup_file", "flow_log_file", "output_file"];

/// Paths for one run. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Lookup table CSV (`dstport,protocol,tag`)
    pub lookup_file: PathBuf,

    /// Flow log CSV (`dstport,protocol`, extra columns ignored)
    pub flow_log_file: PathBuf,

    /// Report destination for the file variant
    pub output_file: PathBuf,
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).map_err(|e| {
            let err = if e.kind() == io::ErrorKind::NotFound {
                FlowTagError::ConfigNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                FlowTagError::ConfigMalformed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            };
            error!("{}", err);
            err
        })?;

        let config = Self::from_json_str(path, &content).inspect_err(|e| error!("{}", e))?;

        info!(
            lookup_file = %config.lookup_file.display(),
            flow_log_file = %config.flow_log_file.display(),
            output_file = %config.output_file.display(),
            "Loaded configuration from {}",
            path.display()
        );

        Ok(config)
    }

    /// Parse configuration content; `path` is only used for error context.
    pub fn from_json_str(path: &Path, content: &str) -> Result<Self> {
        let malformed = |message: String| FlowTagError::ConfigMalformed {
            path: path.to_path_buf(),
            message,
        };

        let json: Value = serde_json::from_str(content).map_err(|e| malformed(e.to_string()))?;

        let Value::Object(fields) = &json else {
            return Err(malformed("expected a JSON object".to_string()));
        };

        for key in REQUIRED_KEYS {
            match fields.get(key) {
                None => {
                    return Err(FlowTagError::ConfigIncomplete {
                        path: path.to_path_buf(),
                        key,
                    })
                }
                Some(Value::String(_)) => {}
                Some(other) => {
                    return Err(malformed(format!(
                        "key '{}' must be a string, found {}",
                        key, other
                    )))
                }
            }
        }

        serde_json::from_value(json).map_err(|e| malformed(e.to_string()))
    }
}
