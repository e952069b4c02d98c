use serde::Serialize;
use thiserror::Error;

/// Structural problems found while normalizing a raw table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("row {row} has {found} cells, header has {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("duplicate column name: {name:?}")]
    DuplicateColumn { name: String },

    #[error("column {name:?} has {found} values, table has {expected} rows")]
    ColumnLength {
        name: String,
        expected: usize,
        found: usize,
    },
}

/// Which table a validation problem was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Observed,
    Reference,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Observed => f.write_str("observed"),
            Side::Reference => f.write_str("reference"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing columns in {side} table: {columns:?}")]
    MissingColumns { side: Side, columns: Vec<String> },

    #[error("mismatched columns: {columns:?}")]
    ValueMismatch { columns: Vec<String> },
}
