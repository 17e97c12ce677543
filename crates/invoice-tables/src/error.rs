use std::io;

use thiserror::Error;

/// Errors that abort a whole extraction or export.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("the uploaded file is not a readable PDF document: {0}")]
    DocumentOpen(#[from] lopdf::Error),

    #[error("spreadsheet write error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset does not fit in one sheet ({rows} rows, {columns} columns)")]
    SheetTooLarge { rows: usize, columns: usize },

    #[error("invalid page selection: {0}")]
    InvalidPageSelection(String),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("no pages available after applying selection")]
    NoPagesSelected,
}

/// Why one detected table could not be turned into a record batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("header row has no columns")]
    EmptyHeader,

    #[error("{header_width} columns passed, data row {row} had {width} columns")]
    RowTooWide {
        row: usize,
        width: usize,
        header_width: usize,
    },
}
