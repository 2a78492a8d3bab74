//! Group-by aggregation for pipeline execution
//!
//! Groups are emitted in first-seen order so output is deterministic for a
//! given input order. Null is a distinct group key. Keys compare with
//! `Scalar` equality, so a NaN key never matches and forms its own group.

use crate::planner::Aggregations;
use crate::record::{Record, RecordSet, Scalar};

use super::errors::StepError;

/// Partitions a working set and reduces each partition to one record
pub struct GroupAggregator;

impl GroupAggregator {
    /// Groups `records` by `field` and applies `aggregations` per group.
    ///
    /// Each output record holds the group key followed by one field per
    /// aggregation. An aggregation over the group field itself replaces the
    /// key in place. A record without `field` falls into the null group.
    pub fn group(
        records: &[Record],
        field: &str,
        aggregations: &Aggregations,
    ) -> Result<RecordSet, StepError> {
        let groups = Self::partition(records, field);

        let mut output = Vec::with_capacity(groups.len());
        for (key, members) in groups {
            let mut row = Record::with_capacity(aggregations.len() + 1);
            row.insert(field, key);

            for (agg_field, aggregation) in aggregations.iter() {
                let values: Vec<Scalar> = members
                    .iter()
                    .filter_map(|r| r.get(agg_field))
                    .filter(|v| !v.is_null())
                    .cloned()
                    .collect();

                let reduced = aggregation
                    .apply(&values)
                    .map_err(|source| StepError::Aggregate {
                        field: agg_field.to_string(),
                        source,
                    })?;
                row.insert(agg_field, reduced);
            }
            output.push(row);
        }
        Ok(output)
    }

    /// First-seen ordered partition by exact key value
    fn partition<'a>(records: &'a [Record], field: &str) -> Vec<(Scalar, Vec<&'a Record>)> {
        let mut groups: Vec<(Scalar, Vec<&'a Record>)> = Vec::new();

        for record in records {
            let key = record.get(field).cloned().unwrap_or(Scalar::Null);
            match groups.iter_mut().find(|(existing, _)| *existing == key) {
                Some((_, members)) => members.push(record),
                None => groups.push((key, vec![record])),
            }
        }
        groups
    }
}
