//! Run orchestration
//!
//! Configuration -> lookup table -> aggregation -> report. Each stage runs to
//! completion and releases its file before the next one starts; the first
//! failure aborts the run.

use tracing::info;

use crate::aggregator::Aggregator;
use crate::config::Config;
use crate::error::Result;
use crate::lookup::LookupTable;
use crate::report;

/// Loads the lookup table and aggregates the flow log named by `config`.
pub fn aggregate(config: &Config) -> Result<Aggregator> {
    let lookup = LookupTable::load(&config.lookup_file)?;
    let aggregator = Aggregator::from_flow_log(&config.flow_log_file, &lookup)?;

    info!(
        lookup_entries = lookup.len(),
        records = aggregator.total_records(),
        "Aggregation complete"
    );

    Ok(aggregator)
}

/// File variant: writes the report to `config.output_file`.
pub fn run_to_file(config: &Config) -> Result<Aggregator> {
    let aggregator = aggregate(config)?;
    report::write_report_file(&config.output_file, &aggregator)?;
    Ok(aggregator)
}

/// Console variant: prints the report to standard output.
/// `config.output_file` is not touched.
pub fn run_to_console(config: &Config) -> Result<Aggregator> {
    let aggregator = aggregate(config)?;
    report::print_report(&aggregator)?;
    Ok(aggregator)
}
