//! Record model for repoquery
//!
//! A record is an ordered mapping from field name to a [`Scalar`]. Every
//! record produced by one source shares the same field set; `Null` means
//! the field is known but the source had no value for it.
//!
//! # Design Principles
//!
//! - Explicit value variants instead of untyped cells
//! - Field order is preserved end to end (header order in, header order out)
//! - Absent and null are distinguishable (`get` returns `Option<&Scalar>`)

mod record;
mod value;

pub use record::{PredicateError, Record, RecordSet};
pub use value::{Scalar, ValueKind};
