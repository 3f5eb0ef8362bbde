use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("input file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported extension for '{}', expected {expected}", path.display())]
    UnsupportedExtension { path: PathBuf, expected: String },

    #[error("workbook has no worksheets: {}", .0.display())]
    EmptyWorkbook(PathBuf),

    #[error("table boundary detection failed: {0}")]
    TableBoundary(String),

    #[error("missing '{marker}' at row {row}")]
    MissingMarker { marker: String, row: usize },

    #[error("header at row {row} has no '{column}' column")]
    MissingHeaderColumn { column: String, row: usize },

    #[error("row {row} has {width} cells but only {header_width} field names")]
    RowWiderThanHeader {
        row: usize,
        width: usize,
        header_width: usize,
    },

    #[error("invalid amount '{value}' at row {row}")]
    InvalidAmount { value: String, row: usize },

    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("invalid option: {0}")]
    InvalidOption(String),
}
