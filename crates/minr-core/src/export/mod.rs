//! CSV export of both record kinds.
//!
//! [`compute_export_rows`] flattens records into an [`ExportTable`] whose
//! column names follow the configured medication names.
//! [`write_csv_exports`] writes one file per kind from the repository
//! snapshots.

mod table;
mod writer;

pub use table::*;
pub use writer::*;

use thiserror::Error;

use crate::views::ViewError;

/// Export errors.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    View(#[from] ViewError),
}

pub type ExportResult<T> = Result<T, ExportError>;
