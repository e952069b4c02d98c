use std::path::Path;

use serde::{Deserialize, Serialize};

/// How a statement document lays out its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Rows and columns already delimited (CSV).
    Delimited,
    /// Tables embedded in fixed-layout pages (PDF).
    Paged,
}

impl SourceFormat {
    /// Pick the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(SourceFormat::Delimited),
            "pdf" => Some(SourceFormat::Paged),
            _ => None,
        }
    }
}

/// Which header wins when a page-based document yields several tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderPolicy {
    /// Each new table's first row replaces the active header.
    #[default]
    LastSeen,
    /// The first table's header is kept; later tables only contribute rows.
    FirstSeen,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    pub header_policy: HeaderPolicy,
}
