//! Query planner subsystem
//!
//! The planner turns a declared operator list into the canonical sequence
//! the executor runs, and renders that sequence for explain output.
//!
//! # Design Principles
//!
//! - Deterministic: same declared operators give the same plan
//! - Declared order is intent, canonical order is execution
//! - Pure: planning never touches data
//!
//! # Canonical Order (strict)
//!
//! 1. Filter
//! 2. GroupBy
//! 3. Sort
//! 4. Select
//! 5. Limit
//!
//! Ties keep their declared order.

mod aggregate;
mod ast;
mod condition;
mod explain;
mod planner;

pub use aggregate::{AggregateError, Aggregation, AggregationName, Aggregations};
pub use ast::{Operator, OperatorKind, Predicate};
pub use condition::{CompareOp, Condition};
pub use explain::{ExplainPlan, ExplainStep};
pub use planner::OperatorPlanner;
