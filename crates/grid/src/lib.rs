//! `tally-grid` — the tabular surface.
//!
//! A workbook is a set of named sheets; a sheet is an ordered grid of
//! string cells. Sheets persist as one CSV file each inside the workbook
//! directory. No HTTP or sync logic lives here.

pub mod sheet;
pub mod workbook;

pub use sheet::Sheet;
pub use workbook::Workbook;

use std::fmt;

/// Error type for workbook operations.
#[derive(Debug)]
pub enum GridError {
    /// A named sheet does not exist in the workbook.
    SheetNotFound(String),
    /// Filesystem error (directory create, file read/write).
    Io(String),
    /// CSV encode/decode error.
    Csv(String),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::SheetNotFound(name) => write!(f, "sheet not found: {name}"),
            GridError::Io(msg) => write!(f, "I/O error: {msg}"),
            GridError::Csv(msg) => write!(f, "CSV error: {msg}"),
        }
    }
}

impl std::error::Error for GridError {}
