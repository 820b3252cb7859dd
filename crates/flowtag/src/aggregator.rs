//! Flow log aggregation
//!
//! One linear pass over the flow log. Each record bumps its (port, protocol)
//! counter, then the counter of the tag the lookup table resolves it to, or
//! [`UNTAGGED`] when there is no entry.

use std::path::Path;

use tracing::{error, info, instrument};

use crate::csv_input::{ColumnReader, CsvFault};
use crate::error::{FlowTagError, Result};
use crate::lookup::LookupTable;
use crate::types::{LookupKey, PortProtocolCounts, TagCounts, UNTAGGED};

/// Columns a flow log file must provide. Others are ignored.
pub const FLOW_LOG_COLUMNS: [&str; 2] = ["dstport", "protocol"];

/// Count maps for a single run.
///
/// Both maps only grow, and after every record
/// `sum(tag_counts) == sum(port_protocol_counts) == total_records`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregator {
    tag_counts: TagCounts,
    port_protocol_counts: PortProtocolCounts,
    total_records: u64,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregates a whole flow log file against `lookup`.
    pub fn from_flow_log(path: impl AsRef<Path>, lookup: &LookupTable) -> Result<Self> {
        let mut aggregator = Self::new();
        aggregator.aggregate_file(path.as_ref(), lookup)?;
        Ok(aggregator)
    }

    /// Adds every record of `path` to the counts.
    ///
    /// A malformed row aborts the pass; records already counted stay in the
    /// maps, so callers should drop the aggregator on error.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn aggregate_file(&mut self, path: &Path, lookup: &LookupTable) -> Result<()> {
        self.read_flow_log(path, lookup)
            .inspect_err(|e| error!("{}", e))
    }

    fn read_flow_log(&mut self, path: &Path, lookup: &LookupTable) -> Result<()> {
        let fault = |fault: CsvFault| match fault {
            CsvFault::NotFound => FlowTagError::FlowLogNotFound {
                path: path.to_path_buf(),
            },
            CsvFault::MissingColumn { column, row } => FlowTagError::FlowLogSchemaError {
                path: path.to_path_buf(),
                column,
                row,
            },
            CsvFault::Read(source) => FlowTagError::flow_log_read(path, source),
        };

        let mut reader = ColumnReader::open(path, FLOW_LOG_COLUMNS).map_err(fault)?;
        while let Some([port, protocol]) = reader.next_row().map_err(fault)? {
            self.record(lookup, LookupKey::new(port, protocol));
        }

        info!(
            records = reader.rows_read(),
            tags = self.tag_counts.len(),
            port_protocol_pairs = self.port_protocol_counts.len(),
            "Parsed flow log {}",
            path.display()
        );

        Ok(())
    }

    /// Counts one flow record.
    pub fn record(&mut self, lookup: &LookupTable, key: LookupKey) {
        let tag = lookup.get(&key).unwrap_or(UNTAGGED);
        match self.tag_counts.get_mut(tag) {
            Some(count) => *count += 1,
            None => {
                self.tag_counts.insert(tag.to_string(), 1);
            }
        }

        *self.port_protocol_counts.entry(key).or_insert(0) += 1;
        self.total_records += 1;
    }

    pub fn tag_counts(&self) -> &TagCounts {
        &self.tag_counts
    }

    pub fn port_protocol_counts(&self) -> &PortProtocolCounts {
        &self.port_protocol_counts
    }

    /// Number of flow records counted.
    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    /// Tag counts in ascending lexical tag order.
    pub fn sorted_tag_counts(&self) -> Vec<(&str, u64)> {
        let mut counts: Vec<(&str, u64)> = self
            .tag_counts
            .iter()
            .map(|(tag, &count)| (tag.as_str(), count))
            .collect();
        counts.sort_unstable_by(|a, b| a.0.cmp(b.0));
        counts
    }

    /// Port/protocol counts ordered by port string, then protocol string.
    pub fn sorted_port_protocol_counts(&self) -> Vec<(&LookupKey, u64)> {
        let mut counts: Vec<(&LookupKey, u64)> = self
            .port_protocol_counts
            .iter()
            .map(|(key, &count)| (key, count))
            .collect();
        counts.sort_unstable_by(|a, b| a.0.cmp(b.0));
        counts
    }
}
