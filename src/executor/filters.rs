//! Predicate filtering for pipeline execution
//!
//! Keeps a record iff its predicate holds. Predicate failures abort the
//! whole step; there is no partial result.

use crate::planner::Predicate;
use crate::record::{Record, RecordSet};

use super::errors::StepError;

/// Applies filter predicates to a working set
pub struct PredicateFilter;

impl PredicateFilter {
    /// Returns the records for which `predicate` holds, in input order
    pub fn apply(records: RecordSet, predicate: &Predicate) -> Result<RecordSet, StepError> {
        let mut kept = Vec::with_capacity(records.len());
        for record in records {
            if Self::matches(&record, predicate)? {
                kept.push(record);
            }
        }
        Ok(kept)
    }

    /// Checks a single record against a predicate
    pub fn matches(record: &Record, predicate: &Predicate) -> Result<bool, StepError> {
        Ok(predicate.evaluate(record)?)
    }
}
