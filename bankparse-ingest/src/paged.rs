//! Page-based (PDF) statements: tables found page by page, rows accumulated
//! under a single header.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use bankparse_core::{RawTable, Row, is_blank_row};
use lopdf::Document;
use tracing::debug;

use crate::content::page_fragments;
use crate::error::IngestError;
use crate::layout::detect_tables;
use crate::types::{ExtractOptions, HeaderPolicy};

/// Extract every table from every page, in document order, into one raw table.
pub fn extract_pdf(path: &Path, options: &ExtractOptions) -> Result<RawTable, IngestError> {
    let document = load_document(path)?;
    let pdf_err = |source| IngestError::Pdf {
        path: path.to_path_buf(),
        source,
    };

    let mut tables = Vec::new();
    for (page_number, page_id) in document.get_pages() {
        let fragments = page_fragments(&document, page_id).map_err(pdf_err)?;
        let placed = fragments.len();
        let found = detect_tables(fragments);
        debug!(page = page_number, fragments = placed, tables = found.len(), "scanned page");
        tables.extend(found);
    }

    Ok(collect_tables(tables, options.header_policy))
}

/// The file handle is moved into the loader and closed when loading returns,
/// on success and on error alike.
fn load_document(path: &Path) -> Result<Document, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Document::load_from(BufReader::new(file)).map_err(|source| IngestError::Pdf {
        path: path.to_path_buf(),
        source,
    })
}

/// Merge per-table rows into one raw table.
///
/// Each table's first row is its header and is never kept as data. Rows equal
/// to that header or to the canonical header, and fully blank rows, are
/// dropped. With no surviving rows the result is empty, header included.
pub fn collect_tables<I>(tables: I, policy: HeaderPolicy) -> RawTable
where
    I: IntoIterator<Item = Vec<Row>>,
{
    let mut header: Option<Row> = None;
    let mut rows: Vec<Row> = Vec::new();
    let mut skipped = 0usize;

    for table in tables {
        let mut lines = table.into_iter();
        let Some(table_header) = lines.next() else {
            continue;
        };

        match policy {
            HeaderPolicy::LastSeen => header = Some(table_header.clone()),
            HeaderPolicy::FirstSeen => {
                header.get_or_insert_with(|| table_header.clone());
            }
        }

        for row in lines {
            if row == table_header || header.as_ref() == Some(&row) || is_blank_row(&row) {
                skipped += 1;
                continue;
            }
            rows.push(row);
        }
    }

    let Some(header) = header else {
        return RawTable::empty();
    };

    // Under last-seen, earlier rows may repeat a header that only became active later.
    rows.retain(|row| *row != header);
    if rows.is_empty() {
        return RawTable::empty();
    }

    debug!(rows = rows.len(), skipped, "collected page tables");
    RawTable::new(header, rows)
}
