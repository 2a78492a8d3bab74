//! Pipeline executor subsystem
//!
//! Consumes canonical operator sequences and produces deterministic results.
//!
//! # Execution Flow (canonical order)
//!
//! 1. Filter records by predicate
//! 2. Group and aggregate
//! 3. Sort (stable, nulls last)
//! 4. Select fields
//! 5. Limit
//!
//! # Invariants
//!
//! - The caller's record set is never mutated
//! - Execution stops at the first failing operator
//! - No partial results

mod errors;
mod executor;
mod filters;
mod grouping;
mod projection;
mod result;
mod sorter;

pub use errors::{ExecutorError, ExecutorErrorCode, ExecutorResult, Severity, StepError};
pub use executor::PipelineExecutor;
pub use filters::PredicateFilter;
pub use grouping::GroupAggregator;
pub use projection::Projector;
pub use result::ExecutionResult;
pub use sorter::ResultSorter;
