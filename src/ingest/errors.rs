//! Ingest errors

use std::path::PathBuf;

use thiserror::Error;

/// Result type for ingest operations
pub type IngestResult<T> = Result<T, IngestError>;

/// Errors raised while reading or writing delimited files
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed delimited input: {0}")]
    Csv(#[from] csv::Error),

    /// Sorted names of expected columns absent from the header
    #[error("Missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Column '{0}' does not exist")]
    UnknownColumn(String),

    #[error("Nothing to write: the record set is empty")]
    EmptyInput,
}
