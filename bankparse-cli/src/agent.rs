//! Per-target pipeline: locate inputs, extract, normalize, validate, retry.

use anyhow::{Context, Result};
use bankparse_core::{NormalizedTable, Side, ValidationResult, check_schema, validate};
use bankparse_ingest::{ExtractOptions, parse_statement};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

use crate::config::{Config, PreferredInput};
use crate::report::{self, ValidationReport};

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("no statement found for {target}: neither {} nor {} exists", .csv.display(), .pdf.display())]
    MissingInput {
        target: String,
        csv: PathBuf,
        pdf: PathBuf,
    },
}

/// Conventional input locations for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementPaths {
    pub csv: PathBuf,
    pub pdf: PathBuf,
}

impl StatementPaths {
    pub fn for_target(data_dir: &Path, target: &str) -> Self {
        let dir = data_dir.join(target);
        Self {
            csv: dir.join("result.csv"),
            pdf: dir.join("sample.pdf"),
        }
    }

    /// The document parsed as the observed table, if any input exists.
    pub fn observed(&self, prefer: PreferredInput) -> Option<&Path> {
        let (first, second) = match prefer {
            PreferredInput::Pdf => (&self.pdf, &self.csv),
            PreferredInput::Csv => (&self.csv, &self.pdf),
        };
        [first, second]
            .into_iter()
            .find(|p| p.exists())
            .map(PathBuf::as_path)
    }

    pub fn reference(&self) -> Option<&Path> {
        self.csv.exists().then_some(self.csv.as_path())
    }
}

/// What a successful attempt produced.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub observed: PathBuf,
    pub rows: usize,
    /// `None` when there was no reference CSV to validate against.
    pub validation: Option<ValidationResult>,
}

pub struct Agent {
    config: Config,
}

impl Agent {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn options(&self) -> ExtractOptions {
        self.config.extract_options()
    }

    /// Run up to `max_attempts` attempts. Failures are reported, not returned;
    /// `None` means every attempt failed.
    pub fn run(&self, target: &str, report_path: Option<&Path>) -> Option<Outcome> {
        let target = target.trim().to_lowercase();
        let max = self.config.max_attempts.max(1);

        for attempt in 1..=max {
            println!("\nAttempt {attempt}/{max} for '{target}'...");
            info!(attempt, max, target = %target, "starting attempt");

            match self.attempt(&target, report_path) {
                Ok(outcome) => {
                    println!("Success on attempt {attempt}");
                    return Some(outcome);
                }
                Err(e) => {
                    error!(attempt, "attempt failed: {e:#}");
                    println!("Attempt {attempt} failed: {e:#}");
                }
            }
        }

        println!("All attempts failed for '{target}'. Check the data files and parser output.");
        None
    }

    fn attempt(&self, target: &str, report_path: Option<&Path>) -> Result<Outcome> {
        let paths = StatementPaths::for_target(&self.config.data_dir, target);
        let observed_path = paths
            .observed(self.config.prefer)
            .ok_or_else(|| AgentError::MissingInput {
                target: target.to_string(),
                csv: paths.csv.clone(),
                pdf: paths.pdf.clone(),
            })?;

        let observed = self.load(observed_path)?;
        report::print_preview(&observed, observed_path, self.config.preview_rows);
        check_schema(&observed, Side::Observed)?;

        let validation = match paths.reference() {
            Some(reference_path) => Some(self.compare_loaded(
                Some(target),
                (observed_path, &observed),
                reference_path,
                report_path,
            )?),
            None => {
                info!(target = %target, "no reference CSV, skipping validation");
                None
            }
        };

        println!("Parser test passed!");
        Ok(Outcome {
            observed: observed_path.to_path_buf(),
            rows: observed.row_count(),
            validation,
        })
    }

    /// Validate two arbitrary documents; prints the per-column outcome first.
    pub fn compare(
        &self,
        observed_path: &Path,
        reference_path: &Path,
        report_path: Option<&Path>,
    ) -> Result<ValidationResult> {
        let observed = self.load(observed_path)?;
        self.compare_loaded(None, (observed_path, &observed), reference_path, report_path)
    }

    /// Extract and normalize one document, with trimmed column names.
    pub fn load(&self, path: &Path) -> Result<NormalizedTable> {
        let mut table = parse_statement(path, &self.options())
            .with_context(|| format!("parsing {}", path.display()))?;
        table.trim_column_names();
        Ok(table)
    }

    fn compare_loaded(
        &self,
        target: Option<&str>,
        observed: (&Path, &NormalizedTable),
        reference_path: &Path,
        report_path: Option<&Path>,
    ) -> Result<ValidationResult> {
        let reference = self.load(reference_path)?;
        let result = validate(observed.1, &reference)?;
        report::print_column_outcomes(&result);

        if let Some(path) = report_path {
            ValidationReport::new(target, observed, (reference_path, &reference), &result).write(path)?;
            info!(path = %path.display(), "wrote validation report");
        }

        Ok(result.into_result()?)
    }
}
