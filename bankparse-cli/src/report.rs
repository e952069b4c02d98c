//! Console output, JSON validation reports and CSV export.

use anyhow::{Context, Result};
use bankparse_core::{EXPECTED_COLUMNS, NormalizedTable, ValidationResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Header plus the first `limit` rows as an aligned text grid.
pub fn render_preview(table: &NormalizedTable, limit: usize) -> String {
    let header: Vec<String> = table.column_names().iter().map(|s| s.to_string()).collect();
    let rows: Vec<Vec<String>> = table.rows().take(limit).collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = line(&header[..]);
    for row in &rows {
        out.push('\n');
        out.push_str(&line(&row[..]));
    }
    out
}

pub fn print_preview(table: &NormalizedTable, source: &Path, limit: usize) {
    println!(
        "\nParsed table ({} rows, {} columns) from {}:",
        table.row_count(),
        table.column_count(),
        source.display()
    );
    println!("{}", render_preview(table, limit));
}

/// One line per expected column, in report order.
pub fn print_column_outcomes(result: &ValidationResult) {
    for name in EXPECTED_COLUMNS {
        if result.is_column_matched(name) {
            println!("✓ Column '{name}' matches");
        } else {
            println!("✗ Column '{name}' does NOT match");
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub generated_at: DateTime<Utc>,
    pub target: Option<String>,
    pub observed: PathBuf,
    pub reference: PathBuf,
    pub observed_rows: usize,
    pub reference_rows: usize,
    pub passed: bool,
    pub matched: Vec<String>,
    pub mismatched: Vec<String>,
}

impl ValidationReport {
    pub fn new(
        target: Option<&str>,
        observed: (&Path, &NormalizedTable),
        reference: (&Path, &NormalizedTable),
        result: &ValidationResult,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            target: target.map(str::to_string),
            observed: observed.0.to_path_buf(),
            reference: reference.0.to_path_buf(),
            observed_rows: observed.1.row_count(),
            reference_rows: reference.1.row_count(),
            passed: result.is_match(),
            matched: result.matched.clone(),
            mismatched: result.mismatched.clone(),
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("serialize report")?;
        fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }
}

/// Write the normalized table as CSV, header first.
pub fn write_table_csv(table: &NormalizedTable, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    wtr.write_record(table.column_names())?;
    for row in table.rows() {
        wtr.write_record(&row)?;
    }
    wtr.flush().with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}
