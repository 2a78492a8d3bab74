//! Result types for pipeline execution

use serde::Serialize;

use crate::record::{Record, RecordSet};

/// Result of pipeline execution
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecutionResult {
    /// Records in result order
    pub records: RecordSet,
    /// Number of records the pipeline started from
    pub input_count: usize,
    /// Number of records returned
    pub returned_count: usize,
    /// Number of operators applied
    pub operators_applied: usize,
}

impl ExecutionResult {
    /// Returns true if no records were produced
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of results
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns an iterator over the records
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Consumes the result, returning the records
    pub fn into_records(self) -> RecordSet {
        self.records
    }
}
