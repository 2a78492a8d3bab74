//! Result sink for delimited text
//!
//! The header is the first record's field names. Every row is written in
//! header order; a field a record lacks becomes an empty cell.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::observability::{log_event_with_fields, Event};
use crate::record::Record;

use super::errors::{IngestError, IngestResult};

/// Writes records as delimited text
#[derive(Debug, Clone)]
pub struct CsvWriter {
    path: PathBuf,
    delimiter: u8,
}

impl CsvWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `records` to the configured path, truncating it.
    ///
    /// An empty record set has no header and is rejected before the file
    /// is created.
    pub fn write(&self, records: &[Record]) -> IngestResult<()> {
        if records.is_empty() {
            return Err(IngestError::EmptyInput);
        }
        let file = File::create(&self.path)?;
        self.write_to(file, records)?;

        let rows = records.len().to_string();
        let path = self.path.display().to_string();
        log_event_with_fields(
            Event::ResultWritten,
            &[("path", path.as_str()), ("records", rows.as_str())],
        );
        Ok(())
    }

    /// Writes `records` to any writer
    pub fn write_to<W: Write>(&self, output: W, records: &[Record]) -> IngestResult<()> {
        let first = records.first().ok_or(IngestError::EmptyInput)?;
        let header: Vec<&str> = first.field_names().collect();

        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(output);

        writer.write_record(&header)?;
        for record in records {
            let row = header
                .iter()
                .map(|field| record.get(field).map(|v| v.render()).unwrap_or_default());
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}
