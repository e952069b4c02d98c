//! Column classification and cell coercion rules.

use serde::{Deserialize, Serialize};

/// Columns every statement table is checked against, in report order.
pub const EXPECTED_COLUMNS: [&str; 5] = ["Date", "Description", "Debit Amt", "Credit Amt", "Balance"];

/// Name fragments that mark a column as holding amounts (case-insensitive).
pub const NUMERIC_MARKERS: [&str; 3] = ["Debit Amt", "Credit Amt", "Balance"];

/// How a column's cells are coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Text,
}

impl ColumnKind {
    /// Classify a header name by substring match against [`NUMERIC_MARKERS`].
    pub fn classify(name: &str) -> Self {
        let lowered = name.to_lowercase();
        if NUMERIC_MARKERS
            .iter()
            .any(|marker| lowered.contains(&marker.to_lowercase()))
        {
            ColumnKind::Numeric
        } else {
            ColumnKind::Text
        }
    }

    pub fn is_numeric(self) -> bool {
        self == ColumnKind::Numeric
    }
}

/// Coerce a cell to an amount.
///
/// Thousands separators are stripped before parsing. Anything that does not
/// parse to a finite number, including an empty or absent cell, becomes 0.
pub fn coerce_amount(cell: Option<&str>) -> f64 {
    let Some(raw) = cell else {
        return 0.0;
    };
    let cleaned = raw.replace(',', "");
    match cleaned.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Round to cents, half to even.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Absent text becomes the empty string, then surrounding whitespace is dropped.
pub fn clean_text(cell: Option<&str>) -> String {
    cell.unwrap_or("").trim().to_string()
}

/// True when the cell parses as a plain number without any cleanup.
pub(crate) fn looks_numeric(cell: &str) -> bool {
    cell.trim().parse::<f64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_substring() {
        assert_eq!(ColumnKind::classify("Debit Amt"), ColumnKind::Numeric);
        assert_eq!(ColumnKind::classify("credit amt (INR)"), ColumnKind::Numeric);
        assert_eq!(ColumnKind::classify("Closing BALANCE"), ColumnKind::Numeric);
        assert_eq!(ColumnKind::classify("Date"), ColumnKind::Text);
        assert_eq!(ColumnKind::classify("Description"), ColumnKind::Text);
        assert_eq!(ColumnKind::classify("Amount"), ColumnKind::Text);
    }

    #[test]
    fn test_coerce_amount_strips_thousands() {
        assert_eq!(coerce_amount(Some("1,250.50")), 1250.5);
        assert_eq!(coerce_amount(Some("  5000.00 ")), 5000.0);
        assert_eq!(coerce_amount(Some("-15.00")), -15.0);
    }

    #[test]
    fn test_coerce_amount_defaults_to_zero() {
        assert_eq!(coerce_amount(Some("abc")), 0.0);
        assert_eq!(coerce_amount(Some("")), 0.0);
        assert_eq!(coerce_amount(None), 0.0);
        assert_eq!(coerce_amount(Some("NaN")), 0.0);
        assert_eq!(coerce_amount(Some("inf")), 0.0);
    }

    #[test]
    fn test_coerce_amount_is_idempotent() {
        for raw in ["1,250.50", "abc", "", "0.1", "-2,000", "12345678.905"] {
            let once = coerce_amount(Some(raw));
            let twice = coerce_amount(Some(&once.to_string()));
            assert_eq!(once, twice, "input {raw:?}");
        }
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(1250.504), 1250.5);
        assert_eq!(round_cents(0.125), 0.12);
        assert_eq!(round_cents(0.375), 0.38);
        assert_eq!(round_cents(-0.125), -0.12);
        assert_eq!(round_cents(round_cents(99.999)), round_cents(99.999));
    }

    #[test]
    fn test_clean_text_is_idempotent() {
        assert_eq!(clean_text(Some(" Salary ")), "Salary");
        assert_eq!(clean_text(None), "");
        let once = clean_text(Some("\t NEFT  transfer \n"));
        assert_eq!(clean_text(Some(&once)), once);
    }
}
