//! Repository statistics
//!
//! Canned reports built exclusively from query builder calls.

mod reports;

pub use reports::{Report, RepositoryStats};
