//! Ordered field-to-value records

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::value::Scalar;

/// Ordered sequence of records
pub type RecordSet = Vec<Record>;

/// Raised by predicates that cannot evaluate a record
#[derive(Debug, Clone, PartialEq)]
pub struct PredicateError {
    message: String,
}

impl PredicateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The record has no such field (not even a null)
    pub fn missing_field(field: &str) -> Self {
        Self::new(format!("field '{}' is absent from record", field))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for PredicateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for PredicateError {}

/// One row: field names in source order, each with a value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Scalar)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Builds a record from `(field, value)` pairs, keeping their order.
    /// A repeated field name overwrites the earlier value in place.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Scalar>,
    {
        let mut record = Self::new();
        for (k, v) in pairs {
            record.insert(k, v);
        }
        record
    }

    /// Returns the value for `field`, or `None` when the field is absent
    pub fn get(&self, field: &str) -> Option<&Scalar> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Like `get`, but an absent field is an error. Intended for predicates.
    pub fn require(&self, field: &str) -> Result<&Scalar, PredicateError> {
        self.get(field)
            .ok_or_else(|| PredicateError::missing_field(field))
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Sets `field`. Existing fields keep their position.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Scalar>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
