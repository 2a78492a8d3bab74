//! Source reader for repository metadata exports
//!
//! Parses a delimited file into records against a fixed set of expected
//! columns. Structural problems (missing columns) fail before any row is
//! parsed. Extra columns are kept as text.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::observability::{log_event_with_fields, Event};
use crate::record::{Record, RecordSet, Scalar};

use super::columns::{repository_columns, ColumnKind, ColumnSpec};
use super::errors::{IngestError, IngestResult};

/// Aggregate figures over a loaded dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub total_records: usize,
    pub unique_languages: usize,
    pub avg_stars: f64,
    pub avg_forks: f64,
    pub most_popular_language: Option<String>,
}

impl DatasetSummary {
    fn empty() -> Self {
        Self {
            total_records: 0,
            unique_languages: 0,
            avg_stars: 0.0,
            avg_forks: 0.0,
            most_popular_language: None,
        }
    }
}

/// Reads delimited repository exports into records
#[derive(Debug)]
pub struct CsvReader {
    path: PathBuf,
    delimiter: u8,
    columns: Vec<ColumnSpec>,
    data: RecordSet,
}

impl CsvReader {
    /// Creates a reader for `path` expecting the repository export columns
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: b',',
            columns: repository_columns(),
            data: Vec::new(),
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Replaces the expected columns
    pub fn with_columns(mut self, columns: Vec<ColumnSpec>) -> Self {
        self.columns = columns;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file, replacing any previously loaded data
    pub fn read(&mut self) -> IngestResult<&[Record]> {
        if !self.path.exists() {
            return Err(IngestError::NotFound(self.path.clone()));
        }
        let file = File::open(&self.path)?;
        self.read_from(file)
    }

    /// Reads delimited text from any reader, replacing loaded data
    pub fn read_from<R: Read>(&mut self, input: R) -> IngestResult<&[Record]> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .from_reader(input);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        self.check_columns(&headers)?;

        let kinds: Vec<ColumnKind> = headers.iter().map(|h| self.kind_of(h)).collect();

        let mut data = Vec::new();
        for row in reader.records() {
            let row = row?;
            let mut record = Record::with_capacity(headers.len());
            for ((name, kind), cell) in headers.iter().zip(&kinds).zip(row.iter()) {
                record.insert(name.as_str(), kind.coerce(cell));
            }
            data.push(record);
        }
        self.data = data;

        let rows = self.data.len().to_string();
        let path = self.path.display().to_string();
        log_event_with_fields(
            Event::DatasetLoaded,
            &[("path", path.as_str()), ("records", rows.as_str())],
        );

        Ok(&self.data)
    }

    fn check_columns(&self, headers: &[String]) -> IngestResult<()> {
        let present: HashSet<&str> = headers.iter().map(String::as_str).collect();
        let mut missing: Vec<String> = self
            .columns
            .iter()
            .filter(|c| !present.contains(c.name.as_str()))
            .map(|c| c.name.clone())
            .collect();

        if missing.is_empty() {
            return Ok(());
        }
        missing.sort();
        Err(IngestError::MissingColumns(missing))
    }

    fn kind_of(&self, header: &str) -> ColumnKind {
        self.columns
            .iter()
            .find(|c| c.name == header)
            .map(|c| c.kind)
            .unwrap_or(ColumnKind::Text)
    }

    /// Loaded records
    pub fn data(&self) -> &[Record] {
        &self.data
    }

    /// Consumes the reader, returning the loaded records
    pub fn into_data(self) -> RecordSet {
        self.data
    }

    /// Values of one expected column, in row order
    pub fn column(&self, name: &str) -> IngestResult<Vec<Scalar>> {
        if !self.columns.iter().any(|c| c.name == name) {
            return Err(IngestError::UnknownColumn(name.to_string()));
        }
        Ok(self
            .data
            .iter()
            .map(|r| r.get(name).cloned().unwrap_or(Scalar::Null))
            .collect())
    }

    /// Records whose language is exactly `language`
    pub fn filter_by_language(&self, language: &str) -> Vec<&Record> {
        self.data
            .iter()
            .filter(|r| r.get("Language").and_then(Scalar::as_str) == Some(language))
            .collect()
    }

    /// Records with at least `min_stars` stars. Unknown star counts never match.
    pub fn filter_by_min_stars(&self, min_stars: i64) -> Vec<&Record> {
        self.data
            .iter()
            .filter(|r| {
                r.get("Stars")
                    .and_then(Scalar::as_i64)
                    .is_some_and(|stars| stars >= min_stars)
            })
            .collect()
    }

    /// Summary figures over the loaded records
    pub fn summary(&self) -> DatasetSummary {
        if self.data.is_empty() {
            return DatasetSummary::empty();
        }

        // Language counts in first-seen order, so ties go to the earliest
        let mut languages: Vec<(&str, usize)> = Vec::new();
        for language in self
            .data
            .iter()
            .filter_map(|r| r.get("Language").and_then(Scalar::as_str))
            .filter(|l| !l.is_empty())
        {
            match languages.iter_mut().find(|(name, _)| *name == language) {
                Some((_, count)) => *count += 1,
                None => languages.push((language, 1)),
            }
        }

        let mut most_popular: Option<(&str, usize)> = None;
        for &(name, count) in &languages {
            if most_popular.map_or(true, |(_, best)| count > best) {
                most_popular = Some((name, count));
            }
        }

        DatasetSummary {
            total_records: self.data.len(),
            unique_languages: languages.len(),
            avg_stars: self.average_of("Stars"),
            avg_forks: self.average_of("Forks"),
            most_popular_language: most_popular.map(|(name, _)| name.to_string()),
        }
    }

    fn average_of(&self, field: &str) -> f64 {
        let values: Vec<f64> = self
            .data
            .iter()
            .filter_map(|r| r.get(field).and_then(Scalar::as_f64))
            .collect();

        if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    }
}
