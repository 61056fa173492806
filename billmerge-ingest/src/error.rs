//! Error types for export ingestion

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("file is not valid {0} text")]
    Decoding(&'static str),

    #[error("missing header row: expected it after {offset} preamble rows, file has {found} rows")]
    MissingHeader { offset: usize, found: usize },

    #[error("header row has {found} columns, expected at least {expected}")]
    ColumnCount { expected: usize, found: usize },

    #[error("column {position}: expected header {expected:?}, found {found:?}")]
    HeaderMismatch {
        position: usize,
        expected: &'static str,
        found: String,
    },

    #[error("data row {row} has {found} columns, expected at least {expected}")]
    ShortRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("data row {row}: cannot parse timestamp {value:?}")]
    InvalidTimestamp { row: usize, value: String },

    #[error("data row {row}: cannot parse amount {value:?}")]
    InvalidAmount { row: usize, value: String },
}

pub type Result<T> = std::result::Result<T, IngestError>;
