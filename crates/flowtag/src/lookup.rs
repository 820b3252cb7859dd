//! Lookup table loader

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, error, info};

use crate::csv_input::{ColumnReader, CsvFault};
use crate::error::{FlowTagError, Result};
use crate::types::LookupKey;

/// Columns a lookup table file must provide.
pub const LOOKUP_COLUMNS: [&str; 3] = ["dstport", "protocol", "tag"];

/// Read-only mapping from (port, protocol) to tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupTable {
    entries: HashMap<LookupKey, String>,
}

impl LookupTable {
    /// Creates an empty table. Every flow record resolves to `Untagged`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a lookup table from CSV.
    ///
    /// File format:
    /// ```text
    /// dstport,protocol,tag
    /// 25,tcp,sv_P1
    /// 443,TCP,sv_P2
    /// ```
    ///
    /// Port and protocol are trimmed and lowercased, the tag is only trimmed.
    /// When a key repeats, the later row wins.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Self::read(path).inspect_err(|e| error!("{}", e))
    }

    fn read(path: &Path) -> Result<Self> {
        let fault = |fault: CsvFault| match fault {
            CsvFault::NotFound => FlowTagError::LookupFileNotFound {
                path: path.to_path_buf(),
            },
            CsvFault::MissingColumn { column, row } => FlowTagError::LookupSchemaError {
                path: path.to_path_buf(),
                column,
                row,
            },
            CsvFault::Read(source) => FlowTagError::lookup_read(path, source),
        };

        let mut reader = ColumnReader::open(path, LOOKUP_COLUMNS).map_err(fault)?;
        let mut table = Self::new();

        while let Some([port, protocol, tag]) = reader.next_row().map_err(fault)? {
            let key = LookupKey::new(port, protocol);
            if let Some(previous) = table.insert(key.clone(), tag) {
                debug!(
                    "Lookup entry {} redefined: '{}' replaced by '{}'",
                    key,
                    previous,
                    tag.trim()
                );
            }
        }

        info!(
            entries = table.len(),
            rows = reader.rows_read(),
            "Loaded lookup table from {}",
            path.display()
        );

        Ok(table)
    }

    /// Adds or replaces the tag for `key`, returning the replaced tag.
    pub fn insert(&mut self, key: LookupKey, tag: &str) -> Option<String> {
        self.entries.insert(key, tag.trim().to_string())
    }

    /// Tag for `key`, if the table has one.
    pub fn get(&self, key: &LookupKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
