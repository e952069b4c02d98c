//! Column-wise comparison of an observed table against a reference table.

use serde::Serialize;
use tracing::debug;

use crate::column::{ColumnKind, EXPECTED_COLUMNS, coerce_amount, round_cents};
use crate::error::{Side, ValidationError};
use crate::table::{ColumnData, NormalizedTable};

/// Partition of [`EXPECTED_COLUMNS`] into matched and mismatched names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub matched: Vec<String>,
    pub mismatched: Vec<String>,
}

impl ValidationResult {
    pub fn is_match(&self) -> bool {
        self.mismatched.is_empty()
    }

    pub fn is_column_matched(&self, name: &str) -> bool {
        self.matched.iter().any(|m| m == name)
    }

    /// Turn any mismatch into a [`ValidationError::ValueMismatch`] naming every column.
    pub fn into_result(self) -> Result<Self, ValidationError> {
        if self.is_match() {
            Ok(self)
        } else {
            Err(ValidationError::ValueMismatch {
                columns: self.mismatched,
            })
        }
    }
}

/// Names of expected columns absent from `table` (names compared trimmed).
pub fn missing_columns(table: &NormalizedTable) -> Vec<String> {
    EXPECTED_COLUMNS
        .iter()
        .filter(|name| table.column_trimmed(name).is_none())
        .map(|name| name.to_string())
        .collect()
}

pub fn check_schema(table: &NormalizedTable, side: Side) -> Result<(), ValidationError> {
    let columns = missing_columns(table);
    if columns.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingColumns { side, columns })
    }
}

/// Compare `observed` with `reference` over [`EXPECTED_COLUMNS`].
///
/// Both sides are re-coerced before comparing: amounts to cents, text trimmed.
/// Every column is checked; a mismatch is reported in the result, not as an
/// error. Use [`ValidationResult::into_result`] to fail on mismatches.
pub fn validate(
    observed: &NormalizedTable,
    reference: &NormalizedTable,
) -> Result<ValidationResult, ValidationError> {
    check_schema(observed, Side::Observed)?;
    check_schema(reference, Side::Reference)?;

    let mut result = ValidationResult::default();
    for name in EXPECTED_COLUMNS {
        let (Some(obs), Some(refc)) = (observed.column_trimmed(name), reference.column_trimmed(name))
        else {
            continue;
        };

        let equal = match ColumnKind::classify(name) {
            ColumnKind::Numeric => rounded_amounts(&obs.data) == rounded_amounts(&refc.data),
            ColumnKind::Text => trimmed_text(&obs.data) == trimmed_text(&refc.data),
        };
        debug!(column = name, equal, "compared column");

        if equal {
            result.matched.push(name.to_string());
        } else {
            result.mismatched.push(name.to_string());
        }
    }

    Ok(result)
}

fn rounded_amounts(data: &ColumnData) -> Vec<f64> {
    match data {
        ColumnData::Amounts(values) => values
            .iter()
            .map(|v| round_cents(if v.is_finite() { *v } else { 0.0 }))
            .collect(),
        ColumnData::Text(values) | ColumnData::Verbatim(values) => values
            .iter()
            .map(|v| round_cents(coerce_amount(Some(v))))
            .collect(),
    }
}

fn trimmed_text(data: &ColumnData) -> Vec<String> {
    data.to_strings()
        .into_iter()
        .map(|s| s.trim().to_string())
        .collect()
}
