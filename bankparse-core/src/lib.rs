//! bankparse-core: statement table model, normalization and validation.

pub mod column;
pub mod error;
pub mod normalize;
pub mod table;
pub mod validate;

pub use column::{ColumnKind, EXPECTED_COLUMNS, NUMERIC_MARKERS, clean_text, coerce_amount, round_cents};
pub use error::{Side, TableError, ValidationError};
pub use normalize::normalize;
pub use table::{Cell, Column, ColumnData, NormalizedTable, RawTable, Row, is_blank_row};
pub use validate::{ValidationResult, check_schema, missing_columns, validate};
