//! bankparse-ingest: statement table extraction from CSV and PDF documents.

pub mod content;
pub mod delimited;
pub mod error;
pub mod layout;
pub mod paged;
pub mod types;

use std::path::Path;

use bankparse_core::{NormalizedTable, RawTable, normalize};
use tracing::warn;

pub use error::IngestError;
pub use types::{ExtractOptions, HeaderPolicy, SourceFormat};

/// Extract the raw table from a statement document with default options.
pub fn extract(path: impl AsRef<Path>) -> Result<RawTable, IngestError> {
    extract_with(path, &ExtractOptions::default())
}

/// Extract the raw table, choosing the strategy from the file extension.
///
/// Unsupported extensions yield an empty table without touching the file.
pub fn extract_with(path: impl AsRef<Path>, options: &ExtractOptions) -> Result<RawTable, IngestError> {
    let path = path.as_ref();
    match SourceFormat::from_path(path) {
        Some(SourceFormat::Delimited) => delimited::extract_csv(path),
        Some(SourceFormat::Paged) => paged::extract_pdf(path, options),
        None => {
            warn!(path = %path.display(), "unsupported statement format, nothing extracted");
            Ok(RawTable::empty())
        }
    }
}

/// Extract and normalize in one step.
pub fn parse_statement(
    path: impl AsRef<Path>,
    options: &ExtractOptions,
) -> Result<NormalizedTable, IngestError> {
    let raw = extract_with(path, options)?;
    Ok(normalize(&raw)?)
}
