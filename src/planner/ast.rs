//! Operator structures
//!
//! Defines the declared query representation consumed by the planner and
//! the executor. One operator is one pipeline step.

use std::fmt;
use std::sync::Arc;

use crate::record::{PredicateError, Record};

use super::aggregate::Aggregations;
use super::condition::Condition;

type PredicateFn = dyn Fn(&Record) -> Result<bool, PredicateError> + Send + Sync;

/// Row filter capability.
///
/// Holds a shared closure so that operator lists can be copied by value.
#[derive(Clone)]
pub struct Predicate {
    label: String,
    function: Arc<PredicateFn>,
}

impl Predicate {
    /// Create a predicate from a fallible closure
    pub fn new<F>(label: impl Into<String>, function: F) -> Self
    where
        F: Fn(&Record) -> Result<bool, PredicateError> + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            function: Arc::new(function),
        }
    }

    /// Create a predicate from a closure that cannot fail
    pub fn from_fn<F>(label: impl Into<String>, function: F) -> Self
    where
        F: Fn(&Record) -> bool + Send + Sync + 'static,
    {
        Self::new(label, move |record: &Record| Ok(function(record)))
    }

    /// Create a predicate from a declarative condition
    pub fn from_condition(condition: Condition) -> Self {
        let label = condition.to_string();
        Self::new(label, move |record: &Record| condition.evaluate(record))
    }

    /// Human-readable description used by explain output
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Evaluates the predicate against one record
    pub fn evaluate(&self, record: &Record) -> Result<bool, PredicateError> {
        (self.function)(record)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").field("label", &self.label).finish()
    }
}

/// Operator kinds, in canonical execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperatorKind {
    Filter,
    GroupBy,
    Sort,
    Select,
    Limit,
}

impl OperatorKind {
    /// Position in the canonical Filter, GroupBy, Sort, Select, Limit order
    pub fn rank(&self) -> u8 {
        match self {
            OperatorKind::Filter => 0,
            OperatorKind::GroupBy => 1,
            OperatorKind::Sort => 2,
            OperatorKind::Select => 3,
            OperatorKind::Limit => 4,
        }
    }

    /// Returns the operator name for explain output
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorKind::Filter => "WHERE",
            OperatorKind::GroupBy => "GROUP BY",
            OperatorKind::Sort => "SORT",
            OperatorKind::Select => "SELECT",
            OperatorKind::Limit => "LIMIT",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single declared pipeline step
#[derive(Debug, Clone)]
pub enum Operator {
    /// Project every record to exactly these fields, in this order
    Select { fields: Vec<String> },
    /// Keep records for which the predicate holds
    Filter { predicate: Predicate },
    /// Stable sort by one field
    Sort { field: String, descending: bool },
    /// Partition by one field and aggregate other fields per group
    GroupBy {
        field: String,
        aggregations: Aggregations,
    },
    /// Keep at most `count` records from the front
    Limit { count: usize },
}

impl Operator {
    /// Create a select operator; duplicate fields are collapsed, first wins
    pub fn select<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for field in fields {
            let field = field.into();
            if !unique.contains(&field) {
                unique.push(field);
            }
        }
        Operator::Select { fields: unique }
    }

    pub fn filter(predicate: Predicate) -> Self {
        Operator::Filter { predicate }
    }

    pub fn sort(field: impl Into<String>, descending: bool) -> Self {
        Operator::Sort {
            field: field.into(),
            descending,
        }
    }

    pub fn group_by(field: impl Into<String>, aggregations: Aggregations) -> Self {
        Operator::GroupBy {
            field: field.into(),
            aggregations,
        }
    }

    pub fn limit(count: usize) -> Self {
        Operator::Limit { count }
    }

    pub fn kind(&self) -> OperatorKind {
        match self {
            Operator::Select { .. } => OperatorKind::Select,
            Operator::Filter { .. } => OperatorKind::Filter,
            Operator::Sort { .. } => OperatorKind::Sort,
            Operator::GroupBy { .. } => OperatorKind::GroupBy,
            Operator::Limit { .. } => OperatorKind::Limit,
        }
    }

    /// Field names this operator references (predicates are opaque)
    pub fn referenced_fields(&self) -> Vec<&str> {
        match self {
            Operator::Select { fields } => fields.iter().map(String::as_str).collect(),
            Operator::Sort { field, .. } => vec![field.as_str()],
            Operator::GroupBy {
                field,
                aggregations,
            } => std::iter::once(field.as_str())
                .chain(aggregations.fields())
                .collect(),
            Operator::Filter { .. } | Operator::Limit { .. } => Vec::new(),
        }
    }
}
