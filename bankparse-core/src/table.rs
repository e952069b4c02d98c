//! Raw and normalized table types.

use std::collections::HashSet;

use crate::column::ColumnKind;
use crate::error::TableError;

/// A single extracted cell. `None` means the source had no value at all.
pub type Cell = Option<String>;

/// One extracted row, in column order.
pub type Row = Vec<Cell>;

/// True when every cell is absent or whitespace.
pub fn is_blank_row(row: &[Cell]) -> bool {
    row.iter()
        .all(|cell| cell.as_deref().is_none_or(|s| s.trim().is_empty()))
}

/// Rows and header exactly as an extractor produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub header: Row,
    pub rows: Vec<Row>,
    /// Set by extractors whose reader infers cell types (delimited files).
    /// Text-kind columns that are entirely numeric are then left verbatim.
    pub typed: bool,
}

impl RawTable {
    pub fn new(header: Row, rows: Vec<Row>) -> Self {
        Self {
            header,
            rows,
            typed: false,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_typed_storage(mut self) -> Self {
        self.typed = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.header.len()
    }
}

/// Values of one normalized column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Numeric-kind column, already coerced.
    Amounts(Vec<f64>),
    /// Text-kind column, absent cells replaced by "" and trimmed.
    Text(Vec<String>),
    /// Text-kind column whose typed source was entirely numeric; kept as read.
    Verbatim(Vec<String>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Amounts(v) => v.len(),
            ColumnData::Text(v) | ColumnData::Verbatim(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render a single cell for display or export.
    pub fn render(&self, row: usize) -> Option<String> {
        match self {
            ColumnData::Amounts(v) => v.get(row).map(|x| x.to_string()),
            ColumnData::Text(v) | ColumnData::Verbatim(v) => v.get(row).cloned(),
        }
    }

    /// Every cell as a string, numbers in shortest round-trip form.
    pub fn to_strings(&self) -> Vec<String> {
        match self {
            ColumnData::Amounts(v) => v.iter().map(|x| x.to_string()).collect(),
            ColumnData::Text(v) | ColumnData::Verbatim(v) => v.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub data: ColumnData,
}

/// Column-oriented result of normalization.
///
/// Column names are unique and every column holds `row_count` values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedTable {
    columns: Vec<Column>,
    row_count: usize,
}

impl NormalizedTable {
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, TableError> {
        let mut seen = HashSet::new();
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(TableError::DuplicateColumn {
                    name: col.name.clone(),
                });
            }
        }

        let row_count = columns.first().map(|c| c.data.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.data.len() != row_count) {
            return Err(TableError::ColumnLength {
                name: bad.name.clone(),
                expected: row_count,
                found: bad.data.len(),
            });
        }

        Ok(Self { columns, row_count })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Exact-name lookup.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Lookup ignoring surrounding whitespace on the stored name.
    pub fn column_trimmed(&self, name: &str) -> Option<&Column> {
        let wanted = name.trim();
        self.columns.iter().find(|c| c.name.trim() == wanted)
    }

    pub fn trim_column_names(&mut self) {
        for col in &mut self.columns {
            let trimmed = col.name.trim();
            if trimmed.len() != col.name.len() {
                col.name = trimmed.to_string();
            }
        }
    }

    /// One row rendered as strings, in column order.
    pub fn row(&self, index: usize) -> Option<Vec<String>> {
        if index >= self.row_count {
            return None;
        }
        Some(
            self.columns
                .iter()
                .map(|c| c.data.render(index).unwrap_or_default())
                .collect(),
        )
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        (0..self.row_count).filter_map(|i| self.row(i))
    }
}
