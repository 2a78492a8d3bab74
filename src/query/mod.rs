//! Query builder subsystem
//!
//! The facade callers use: declare operators, explain them, execute them.
//!
//! # Design Principles
//!
//! - Fail fast: unknown fields are rejected at declaration time
//! - Declared order never changes results
//! - The source snapshot is never mutated

mod builder;
mod errors;

pub use builder::QueryBuilder;
pub use errors::{QueryError, QueryResult};
