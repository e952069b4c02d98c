//! Delimited (CSV) statements: the whole file is one table, first record is the header.

use std::fs::File;
use std::path::Path;

use bankparse_core::{RawTable, Row};
use csv::StringRecord;
use tracing::debug;

use crate::error::IngestError;

/// Read a CSV file as a raw table. Empty fields become absent cells.
///
/// Data rows are kept as read; blank lines are skipped by the reader.
pub fn extract_csv(path: &Path) -> Result<RawTable, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let csv_err = |source| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut records = rdr.records();
    let header = match records.next() {
        Some(record) => to_row(&record.map_err(csv_err)?),
        None => return Ok(RawTable::empty().with_typed_storage()),
    };

    let mut rows = Vec::new();
    for record in records {
        rows.push(to_row(&record.map_err(csv_err)?));
    }

    debug!(path = %path.display(), rows = rows.len(), "read delimited statement");
    Ok(RawTable::new(header, rows).with_typed_storage())
}

fn to_row(record: &StringRecord) -> Row {
    record
        .iter()
        .map(|field| (!field.is_empty()).then(|| field.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_header_and_rows() {
        let file = write_csv(
            "Date,Description,Debit Amt,Credit Amt,Balance\n\
             01-08-2024,Salary Credit,,5000.00,15000.00\n\
             02-08-2024,\"ATM, Main St\",200.00,,14800.00\n",
        );

        let raw = extract_csv(file.path()).unwrap();
        assert!(raw.typed);
        assert_eq!(raw.width(), 5);
        assert_eq!(raw.row_count(), 2);
        assert_eq!(raw.header[2].as_deref(), Some("Debit Amt"));
        assert_eq!(raw.rows[0][2], None);
        assert_eq!(raw.rows[1][1].as_deref(), Some("ATM, Main St"));
    }

    #[test]
    fn test_rows_are_not_filtered() {
        let file = write_csv("Date,Description\nDate,Description\n,\n");
        let raw = extract_csv(file.path()).unwrap();
        assert_eq!(raw.row_count(), 2);
    }

    #[test]
    fn test_empty_file_is_empty_table() {
        let file = write_csv("");
        let raw = extract_csv(file.path()).unwrap();
        assert!(raw.is_empty());
        assert!(raw.header.is_empty());
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let err = extract_csv(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, IngestError::Open { .. }));
    }
}
