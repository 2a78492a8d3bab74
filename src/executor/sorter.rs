//! Record sorting for pipeline execution
//!
//! Ordering rules:
//! - Non-null values compare by natural order of their kind
//! - Nulls sort last in both directions
//! - A column holding two non-null kinds is rejected before any reordering
//! - Ties keep their input order (stable sort)

use std::cmp::Ordering;

use crate::record::{Record, Scalar, ValueKind};

use super::errors::StepError;

/// Sorts a working set by one field
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts `records` in place by `field`.
    ///
    /// On error the slice is left untouched.
    pub fn sort(records: &mut [Record], field: &str, descending: bool) -> Result<(), StepError> {
        Self::check_sortable(records, field)?;

        records.sort_by(|a, b| {
            let a_val = a.get(field).unwrap_or(&Scalar::Null);
            let b_val = b.get(field).unwrap_or(&Scalar::Null);
            Self::compare_values(a_val, b_val, descending)
        });
        Ok(())
    }

    /// Verifies every record carries `field` and that its non-null values
    /// share one kind.
    fn check_sortable(records: &[Record], field: &str) -> Result<(), StepError> {
        let mut seen: Option<ValueKind> = None;

        for record in records {
            let value = record.get(field).ok_or_else(|| StepError::MissingField {
                field: field.to_string(),
            })?;

            if value.is_null() {
                continue;
            }

            match seen {
                None => seen = Some(value.kind()),
                Some(kind) if kind == value.kind() => {}
                Some(kind) => {
                    return Err(StepError::MixedKinds {
                        field: field.to_string(),
                        first: kind,
                        second: value.kind(),
                    })
                }
            }
        }
        Ok(())
    }

    fn compare_values(a: &Scalar, b: &Scalar, descending: bool) -> Ordering {
        match (a.is_null(), b.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                // Kinds were checked up front
                let ordering = a.compare(b).unwrap_or(Ordering::Equal);
                if descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            }
        }
    }
}
