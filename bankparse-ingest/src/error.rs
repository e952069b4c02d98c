use std::io;
use std::path::PathBuf;

use bankparse_core::TableError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot open {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read delimited file {}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("cannot parse page document {}", .path.display())]
    Pdf {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    #[error(transparent)]
    Table(#[from] TableError),
}
