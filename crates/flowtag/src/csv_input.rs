//! Column-addressed CSV reading shared by the lookup and flow log loaders.
//!
//! Header names are matched exactly (case-sensitive, untrimmed) and may
//! appear in any order; extra columns are ignored. Rows are read flexibly so
//! a short row surfaces as a missing column instead of a length mismatch.

use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io;
use std::path::Path;

/// Why a CSV source could not be read. Each loader maps this onto its own
/// error variants.
#[derive(Debug)]
pub(crate) enum CsvFault {
    NotFound,
    MissingColumn { column: &'static str, row: u64 },
    Read(csv::Error),
}

/// Reader yielding the `N` required fields of each data row.
///
/// Required columns are resolved against the header when the first data row
/// is read, so a file without data rows (even a zero-byte one) reads as empty
/// whatever its header says.
pub(crate) struct ColumnReader<const N: usize> {
    reader: csv::Reader<File>,
    columns: [&'static str; N],
    headers: StringRecord,
    indices: Option<[usize; N]>,
    record: StringRecord,
    row: u64,
}

impl<const N: usize> ColumnReader<N> {
    /// Opens `path` and reads its header row.
    pub(crate) fn open(path: &Path, columns: [&'static str; N]) -> Result<Self, CsvFault> {
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => CsvFault::NotFound,
            _ => CsvFault::Read(e.into()),
        })?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let headers = reader.headers().map_err(CsvFault::Read)?.clone();

        Ok(Self {
            reader,
            columns,
            headers,
            indices: None,
            record: StringRecord::new(),
            row: 0,
        })
    }

    /// Reads the next data row. Blank lines are skipped by the CSV parser.
    pub(crate) fn next_row(&mut self) -> Result<Option<[&str; N]>, CsvFault> {
        if !self
            .reader
            .read_record(&mut self.record)
            .map_err(CsvFault::Read)?
        {
            return Ok(None);
        }
        self.row += 1;

        let indices = match self.indices {
            Some(indices) => indices,
            None => {
                let indices = resolve_columns(&self.headers, self.columns)?;
                self.indices = Some(indices);
                indices
            }
        };

        let mut fields = [""; N];
        for (i, field) in fields.iter_mut().enumerate() {
            *field = self
                .record
                .get(indices[i])
                .ok_or(CsvFault::MissingColumn {
                    column: self.columns[i],
                    row: self.row,
                })?;
        }

        Ok(Some(fields))
    }

    /// Number of data rows read so far.
    pub(crate) fn rows_read(&self) -> u64 {
        self.row
    }
}

/// Header position of each required column. A missing one is reported
/// against the header (row 0).
fn resolve_columns<const N: usize>(
    headers: &StringRecord,
    columns: [&'static str; N],
) -> Result<[usize; N], CsvFault> {
    let mut indices = [0usize; N];
    for (slot, column) in indices.iter_mut().zip(columns) {
        // Last duplicate header wins, like a dict built from the header row.
        *slot = headers
            .iter()
            .enumerate()
            .filter(|(_, name)| *name == column)
            .map(|(i, _)| i)
            .last()
            .ok_or(CsvFault::MissingColumn { column, row: 0 })?;
    }
    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_columns_any_order() {
        let file = csv_file("protocol,extra,dstport\ntcp,x,25\n\nudp,y,53\n");
        let mut reader = ColumnReader::open(file.path(), ["dstport", "protocol"]).unwrap();

        assert_eq!(reader.next_row().unwrap(), Some(["25", "tcp"]));
        assert_eq!(reader.next_row().unwrap(), Some(["53", "udp"]));
        assert_eq!(reader.next_row().unwrap(), None);
        assert_eq!(reader.rows_read(), 2);
    }

    #[test]
    fn test_missing_header_column() {
        let file = csv_file("dstport,proto\n25,tcp\n");
        let mut reader = ColumnReader::open(file.path(), ["dstport", "protocol"]).unwrap();
        assert!(matches!(
            reader.next_row(),
            Err(CsvFault::MissingColumn {
                column: "protocol",
                row: 0
            })
        ));
    }

    #[test]
    fn test_header_names_case_sensitive() {
        let file = csv_file("DSTPORT,protocol\n25,tcp\n");
        let mut reader = ColumnReader::open(file.path(), ["dstport", "protocol"]).unwrap();
        assert!(matches!(
            reader.next_row(),
            Err(CsvFault::MissingColumn {
                column: "dstport",
                ..
            })
        ));
    }

    #[test]
    fn test_wrong_header_without_rows_is_empty() {
        let file = csv_file("port,protocol\n");
        let mut reader = ColumnReader::open(file.path(), ["dstport", "protocol"]).unwrap();
        assert_eq!(reader.next_row().unwrap(), None);
        assert_eq!(reader.rows_read(), 0);
    }

    #[test]
    fn test_zero_byte_file_is_empty() {
        let file = csv_file("");
        let mut reader = ColumnReader::open(file.path(), ["dstport", "protocol"]).unwrap();
        assert_eq!(reader.next_row().unwrap(), None);
        assert_eq!(reader.rows_read(), 0);
    }

    #[test]
    fn test_duplicate_header_last_wins() {
        let file = csv_file("dstport,protocol,dstport\n1,tcp,25\n");
        let mut reader = ColumnReader::open(file.path(), ["dstport", "protocol"]).unwrap();
        assert_eq!(reader.next_row().unwrap(), Some(["25", "tcp"]));
    }

    #[test]
    fn test_short_row_reports_column_and_row() {
        let file = csv_file("dstport,protocol\n25,tcp\n443\n");
        let mut reader = ColumnReader::open(file.path(), ["dstport", "protocol"]).unwrap();
        assert!(reader.next_row().unwrap().is_some());
        match reader.next_row() {
            Err(CsvFault::MissingColumn { column, row }) => {
                assert_eq!(column, "protocol");
                assert_eq!(row, 2);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ColumnReader::open(Path::new("/nonexistent/flows.csv"), ["dstport"]),
            Err(CsvFault::NotFound)
        ));
    }
}
