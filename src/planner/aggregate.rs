//! Aggregation functions for group-by
//!
//! Aggregations receive only the non-null values of one field within one
//! group. The executor never calls them with an empty slice; `apply` still
//! answers null for it so custom callers get a defined result.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::record::Scalar;

/// Raised when an aggregation cannot reduce its input
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateError {
    message: String,
}

impl AggregateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn not_numeric(name: &str, value: &Scalar) -> Self {
        Self::new(format!(
            "{} expects numbers, got {} value {}",
            name,
            value.kind(),
            value
        ))
    }

    fn incomparable(name: &str, a: &Scalar, b: &Scalar) -> Self {
        Self::new(format!(
            "{} cannot compare {} with {}",
            name,
            a.kind(),
            b.kind()
        ))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for AggregateError {}

type AggregateFn = dyn Fn(&[Scalar]) -> Result<Scalar, AggregateError> + Send + Sync;

/// Reducer from a group's non-null values to one scalar
#[derive(Clone)]
pub enum Aggregation {
    /// Int when every input is Int, Float otherwise
    Sum,
    /// Always Float
    Average,
    /// Number of non-null values
    Count,
    /// Largest value by natural order
    Max,
    /// Smallest value by natural order
    Min,
    /// Caller-supplied reducer
    Custom {
        name: String,
        function: Arc<AggregateFn>,
    },
}

impl Aggregation {
    pub fn custom<F>(name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&[Scalar]) -> Result<Scalar, AggregateError> + Send + Sync + 'static,
    {
        Aggregation::Custom {
            name: name.into(),
            function: Arc::new(function),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Aggregation::Sum => "sum",
            Aggregation::Average => "average",
            Aggregation::Count => "count",
            Aggregation::Max => "max",
            Aggregation::Min => "min",
            Aggregation::Custom { name, .. } => name,
        }
    }

    /// Reduces `values` to one scalar. Empty input yields null.
    pub fn apply(&self, values: &[Scalar]) -> Result<Scalar, AggregateError> {
        if values.is_empty() {
            return Ok(Scalar::Null);
        }

        match self {
            Aggregation::Sum => sum(values),
            Aggregation::Average => {
                let total = numeric_total(self.name(), values)?;
                Ok(Scalar::Float(total / values.len() as f64))
            }
            Aggregation::Count => Ok(Scalar::Int(values.len() as i64)),
            Aggregation::Max => extreme(self.name(), values, Ordering::Greater),
            Aggregation::Min => extreme(self.name(), values, Ordering::Less),
            Aggregation::Custom { function, .. } => function(values),
        }
    }
}

impl fmt::Debug for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Aggregation({})", self.name())
    }
}

fn numeric_total(name: &str, values: &[Scalar]) -> Result<f64, AggregateError> {
    values.iter().try_fold(0.0, |acc, value| {
        value
            .as_f64()
            .map(|v| acc + v)
            .ok_or_else(|| AggregateError::not_numeric(name, value))
    })
}

fn sum(values: &[Scalar]) -> Result<Scalar, AggregateError> {
    let all_int: Option<Vec<i64>> = values.iter().map(Scalar::as_i64).collect();
    if let Some(ints) = all_int {
        if let Some(total) = ints.iter().try_fold(0i64, |acc, v| acc.checked_add(*v)) {
            return Ok(Scalar::Int(total));
        }
    }
    numeric_total("sum", values).map(Scalar::Float)
}

fn extreme(name: &str, values: &[Scalar], wanted: Ordering) -> Result<Scalar, AggregateError> {
    let mut best = &values[0];
    for value in &values[1..] {
        match value.compare(best) {
            Some(ord) if ord == wanted => best = value,
            Some(_) => {}
            None => return Err(AggregateError::incomparable(name, best, value)),
        }
    }
    Ok(best.clone())
}

/// Built-in aggregation names accepted in query documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationName {
    Sum,
    #[serde(alias = "avg")]
    Average,
    Count,
    Max,
    Min,
}

impl From<AggregationName> for Aggregation {
    fn from(name: AggregationName) -> Self {
        match name {
            AggregationName::Sum => Aggregation::Sum,
            AggregationName::Average => Aggregation::Average,
            AggregationName::Count => Aggregation::Count,
            AggregationName::Max => Aggregation::Max,
            AggregationName::Min => Aggregation::Min,
        }
    }
}

/// Ordered `(field, aggregation)` pairs; order is the output field order
#[derive(Debug, Clone, Default)]
pub struct Aggregations {
    entries: Vec<(String, Aggregation)>,
}

impl Aggregations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the aggregation for `field`
    pub fn with(mut self, field: impl Into<String>, aggregation: Aggregation) -> Self {
        self.insert(field, aggregation);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, aggregation: Aggregation) {
        let field = field.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = aggregation,
            None => self.entries.push((field, aggregation)),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Aggregation)> {
        self.entries.iter().map(|(name, agg)| (name.as_str(), agg))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
