//! Ingest subsystem
//!
//! Boundary collaborators that move records in and out of delimited text.
//!
//! # Design Principles
//!
//! - Types are settled at the boundary: the pipeline never re-coerces
//! - Structural mismatches fail before any row is parsed
//! - Writing never guesses a header: empty input is an error

mod columns;
mod errors;
mod reader;
mod writer;

pub use columns::{repository_columns, ColumnKind, ColumnSpec};
pub use errors::{IngestError, IngestResult};
pub use reader::{CsvReader, DatasetSummary};
pub use writer::CsvWriter;
