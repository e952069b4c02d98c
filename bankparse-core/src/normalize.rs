//! Coerce a raw extracted table into typed, column-oriented form.
//!
//! Data-quality problems (unparseable amounts, absent text) are repaired with
//! the zero / empty-string defaults. Structural problems are errors.

use tracing::debug;

use crate::column::{ColumnKind, clean_text, coerce_amount, looks_numeric};
use crate::error::TableError;
use crate::table::{Column, ColumnData, NormalizedTable, RawTable};

/// Normalize every column of `raw`, keeping column and row order.
///
/// Every row must have exactly as many cells as the header.
pub fn normalize(raw: &RawTable) -> Result<NormalizedTable, TableError> {
    let width = raw.width();
    for (i, row) in raw.rows.iter().enumerate() {
        if row.len() != width {
            return Err(TableError::RowLength {
                row: i,
                expected: width,
                found: row.len(),
            });
        }
    }

    let mut columns = Vec::with_capacity(width);
    for (j, header_cell) in raw.header.iter().enumerate() {
        let name = header_cell.clone().unwrap_or_default();
        let kind = ColumnKind::classify(&name);
        let cells: Vec<Option<&str>> = raw.rows.iter().map(|row| row[j].as_deref()).collect();

        let data = match kind {
            ColumnKind::Numeric => {
                ColumnData::Amounts(cells.iter().map(|c| coerce_amount(*c)).collect())
            }
            ColumnKind::Text if raw.typed && has_numeric_storage(&cells) => ColumnData::Verbatim(
                cells
                    .iter()
                    .map(|c| c.unwrap_or_default().to_string())
                    .collect(),
            ),
            ColumnKind::Text => ColumnData::Text(cells.iter().map(|c| clean_text(*c)).collect()),
        };

        debug!(column = %name, ?kind, rows = data.len(), "normalized column");
        columns.push(Column { name, kind, data });
    }

    NormalizedTable::from_columns(columns)
}

/// A typed reader would have stored this column as numbers.
fn has_numeric_storage(cells: &[Option<&str>]) -> bool {
    let mut present = cells.iter().flatten().peekable();
    present.peek().is_some() && present.all(|c| looks_numeric(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Row;

    fn row(cells: &[Option<&str>]) -> Row {
        cells.iter().map(|c| c.map(str::to_string)).collect()
    }

    fn statement_header() -> Row {
        row(&[
            Some("Date"),
            Some("Description"),
            Some("Debit Amt"),
            Some("Credit Amt"),
            Some("Balance"),
        ])
    }

    #[test]
    fn test_salary_row() {
        let raw = RawTable::new(
            statement_header(),
            vec![row(&[
                Some("2024-01-05"),
                Some(" Salary "),
                Some(""),
                Some("5000.00"),
                Some("15000.00"),
            ])],
        );

        let table = normalize(&raw).unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(
            table.column("Date").unwrap().data,
            ColumnData::Text(vec!["2024-01-05".into()])
        );
        assert_eq!(
            table.column("Description").unwrap().data,
            ColumnData::Text(vec!["Salary".into()])
        );
        assert_eq!(table.column("Debit Amt").unwrap().data, ColumnData::Amounts(vec![0.0]));
        assert_eq!(table.column("Credit Amt").unwrap().data, ColumnData::Amounts(vec![5000.0]));
        assert_eq!(table.column("Balance").unwrap().data, ColumnData::Amounts(vec![15000.0]));
    }

    #[test]
    fn test_amount_cleanup_and_defaults() {
        let raw = RawTable::new(
            row(&[Some("Balance")]),
            vec![row(&[Some("1,250.50")]), row(&[Some("abc")]), row(&[None])],
        );
        let table = normalize(&raw).unwrap();
        assert_eq!(
            table.column("Balance").unwrap().data,
            ColumnData::Amounts(vec![1250.5, 0.0, 0.0])
        );
    }

    #[test]
    fn test_absent_text_becomes_empty() {
        let raw = RawTable::new(row(&[Some("Description")]), vec![row(&[None])]);
        let table = normalize(&raw).unwrap();
        assert_eq!(
            table.column("Description").unwrap().data,
            ColumnData::Text(vec![String::new()])
        );
    }

    #[test]
    fn test_short_row_is_structural_error() {
        let raw = RawTable::new(
            statement_header(),
            vec![row(&[Some("2024-01-05"), Some("Salary")])],
        );
        assert_eq!(
            normalize(&raw).unwrap_err(),
            TableError::RowLength {
                row: 0,
                expected: 5,
                found: 2
            }
        );
    }

    #[test]
    fn test_duplicate_header_is_structural_error() {
        let raw = RawTable::new(row(&[None, None]), vec![row(&[Some("a"), Some("b")])]);
        assert!(matches!(
            normalize(&raw).unwrap_err(),
            TableError::DuplicateColumn { .. }
        ));
    }

    #[test]
    fn test_numeric_text_column_kept_verbatim_for_typed_source() {
        let raw = RawTable::new(
            row(&[Some("Ref No"), Some("Description")]),
            vec![row(&[Some(" 1001"), Some(" a ")]), row(&[None, Some("b")])],
        )
        .with_typed_storage();

        let table = normalize(&raw).unwrap();
        assert_eq!(
            table.column("Ref No").unwrap().data,
            ColumnData::Verbatim(vec![" 1001".into(), String::new()])
        );
        assert_eq!(
            table.column("Description").unwrap().data,
            ColumnData::Text(vec!["a".into(), "b".into()])
        );
    }

    #[test]
    fn test_numeric_text_column_trimmed_for_untyped_source() {
        let raw = RawTable::new(row(&[Some("Ref No")]), vec![row(&[Some(" 1001 ")])]);
        let table = normalize(&raw).unwrap();
        assert_eq!(
            table.column("Ref No").unwrap().data,
            ColumnData::Text(vec!["1001".into()])
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = RawTable::new(
            statement_header(),
            vec![
                row(&[Some(" 01/02/2024"), Some("UPI  "), Some("1,000.256"), None, Some("x")]),
                row(&[None, Some("ATM"), Some(""), Some("20"), Some("-3.5")]),
            ],
        );
        let once = normalize(&raw).unwrap();

        let header = once.column_names().into_iter().map(|n| Some(n.to_string())).collect();
        let rows = once
            .rows()
            .map(|r| r.into_iter().map(Some).collect())
            .collect();
        let twice = normalize(&RawTable::new(header, rows)).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_header_only_table_keeps_columns() {
        let table = normalize(&RawTable::new(statement_header(), Vec::new())).unwrap();
        assert_eq!(table.column_count(), 5);
        assert_eq!(table.row_count(), 0);
    }
}
