//! Report rendering
//!
//! Two fixed-width tables: counts per tag, then counts per (port, protocol).
//! Rows come from the aggregator's sorted views, so rendering the same
//! counts always yields the same bytes.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::{error, info};

use crate::aggregator::Aggregator;
use crate::error::{FlowTagError, Result};

/// Minimum width of the tag column
pub const TAG_WIDTH: usize = 15;
/// Minimum width of the port column
pub const PORT_WIDTH: usize = 10;
/// Minimum width of the protocol column
pub const PROTOCOL_WIDTH: usize = 10;

const TAG_SECTION_TITLE: &str = "Tag Counts:";
const TAG_HEADER: &str = "Tag            Count";
const PORT_SECTION_TITLE: &str = "Port/Protocol Combination Counts:";
const PORT_HEADER: &str = "Port       Protocol  Count";

/// Destination name used in errors and logs for console output.
pub const STDOUT_DESTINATION: &str = "<stdout>";

/// Spacing between section titles and tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportLayout {
    /// Report file: one blank line separates the two sections.
    #[default]
    File,
    /// Console: additionally a blank line after each section title.
    Console,
}

/// Renders the full report text.
pub fn render_report(aggregator: &Aggregator, layout: ReportLayout) -> String {
    let title_gap = match layout {
        ReportLayout::File => "",
        ReportLayout::Console => "\n",
    };

    let mut out = String::new();

    out.push_str(TAG_SECTION_TITLE);
    out.push('\n');
    out.push_str(title_gap);
    out.push_str(TAG_HEADER);
    out.push('\n');
    for (tag, count) in aggregator.sorted_tag_counts() {
        out.push_str(&format!("{:<width$} {}\n", tag, count, width = TAG_WIDTH));
    }

    out.push('\n');
    out.push_str(PORT_SECTION_TITLE);
    out.push('\n');
    out.push_str(title_gap);
    out.push_str(PORT_HEADER);
    out.push('\n');
    for (key, count) in aggregator.sorted_port_protocol_counts() {
        out.push_str(&format!(
            "{:<pw$} {:<qw$} {}\n",
            key.port(),
            key.protocol(),
            count,
            pw = PORT_WIDTH,
            qw = PROTOCOL_WIDTH
        ));
    }

    out
}

/// Writes the report to any writer and flushes it.
pub fn write_report<W: Write>(
    writer: &mut W,
    aggregator: &Aggregator,
    layout: ReportLayout,
) -> io::Result<()> {
    writer.write_all(render_report(aggregator, layout).as_bytes())?;
    writer.flush()
}

/// Truncates `path` and writes the report in file layout.
///
/// A failure part way through can leave a truncated file behind.
pub fn write_report_file(path: impl AsRef<Path>, aggregator: &Aggregator) -> Result<()> {
    let path = path.as_ref();
    let destination = path.display().to_string();

    let result = File::create(path).and_then(|file| {
        let mut writer = BufWriter::new(file);
        write_report(&mut writer, aggregator, ReportLayout::File)
    });

    match result {
        Ok(()) => {
            info!(
                tags = aggregator.tag_counts().len(),
                port_protocol_pairs = aggregator.port_protocol_counts().len(),
                "Wrote report to {}",
                destination
            );
            Ok(())
        }
        Err(e) => {
            let err = FlowTagError::report_write(destination, e);
            error!("{}", err);
            Err(err)
        }
    }
}

/// Writes the report to standard output in console layout.
pub fn print_report(aggregator: &Aggregator) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_report(&mut handle, aggregator, ReportLayout::Console).map_err(|e| {
        let err = FlowTagError::report_write(STDOUT_DESTINATION, e);
        error!("{}", err);
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::LookupTable;
    use crate::types::LookupKey;
    use pretty_assertions::assert_eq;

    fn sample_aggregator() -> Aggregator {
        let mut lookup = LookupTable::new();
        lookup.insert(LookupKey::new("25", "tcp"), "sv_P1");
        lookup.insert(LookupKey::new("443", "tcp"), "sv_P2");

        let mut agg = Aggregator::new();
        for (port, protocol) in [("25", "tcp"), ("443", "tcp"), ("80", "tcp")] {
            agg.record(&lookup, LookupKey::new(port, protocol));
        }
        agg
    }

    #[test]
    fn test_render_file_layout() {
        let expected = "\
Tag Counts:
Tag            Count
Untagged        1
sv_P1           1
sv_P2           1

Port/Protocol Combination Counts:
Port       Protocol  Count
25         tcp        1
443        tcp        1
80         tcp        1
";
        assert_eq!(render_report(&sample_aggregator(), ReportLayout::File), expected);
    }

    #[test]
    fn test_render_console_layout() {
        let expected = "\
Tag Counts:

Tag            Count
Untagged        1
sv_P1           1
sv_P2           1

Port/Protocol Combination Counts:

Port       Protocol  Count
25         tcp        1
443        tcp        1
80         tcp        1
";
        assert_eq!(render_report(&sample_aggregator(), ReportLayout::Console), expected);
    }

    #[test]
    fn test_write_report_console_bytes() {
        let mut out: Vec<u8> = Vec::new();
        write_report(&mut out, &sample_aggregator(), ReportLayout::Console).unwrap();

        let expected: &[u8] = b"Tag Counts:\n\nTag            Count\n\
Untagged        1\nsv_P1           1\nsv_P2           1\n\
\nPort/Protocol Combination Counts:\n\nPort       Protocol  Count\n\
25         tcp        1\n443        tcp        1\n80         tcp        1\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_render_empty_counts() {
        let expected = "\
Tag Counts:
Tag            Count

Port/Protocol Combination Counts:
Port       Protocol  Count
";
        assert_eq!(render_report(&Aggregator::new(), ReportLayout::File), expected);
    }

    #[test]
    fn test_long_values_not_truncated() {
        let mut lookup = LookupTable::new();
        lookup.insert(
            LookupKey::new("65535", "icmpv6-extended"),
            "a_very_long_tag_name",
        );
        let mut agg = Aggregator::new();
        agg.record(&lookup, LookupKey::new("65535", "icmpv6-extended"));

        let report = render_report(&agg, ReportLayout::File);
        assert!(report.contains("a_very_long_tag_name 1\n"));
        assert!(report.contains("65535      icmpv6-extended 1\n"));
    }

    #[test]
    fn test_write_report_file_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.txt");
        std::fs::write(&path, "stale content that is longer than nothing\n".repeat(20)).unwrap();

        write_report_file(&path, &Aggregator::new()).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, render_report(&Aggregator::new(), ReportLayout::File));
    }

    #[test]
    fn test_write_report_file_bad_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("output.txt");

        let err = write_report_file(&path, &sample_aggregator()).unwrap_err();
        assert!(matches!(err, FlowTagError::ReportWriteError { .. }));
    }
}
