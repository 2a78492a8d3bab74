//! Select and limit steps
//!
//! Neither step can fail: select yields null for a field a record lacks,
//! and limit only truncates.

use crate::record::{Record, RecordSet, Scalar};

/// Projects records to a fixed field list
pub struct Projector;

impl Projector {
    /// Projects every record to exactly `fields`, in that order
    pub fn select(records: RecordSet, fields: &[String]) -> RecordSet {
        records
            .iter()
            .map(|record| Self::project(record, fields))
            .collect()
    }

    fn project(record: &Record, fields: &[String]) -> Record {
        let mut projected = Record::with_capacity(fields.len());
        for field in fields {
            let value = record.get(field).cloned().unwrap_or(Scalar::Null);
            projected.insert(field.as_str(), value);
        }
        projected
    }

    /// Keeps at most `count` records from the front
    pub fn limit(mut records: RecordSet, count: usize) -> RecordSet {
        records.truncate(count);
        records
    }
}
