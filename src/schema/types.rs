//! Schema type definitions
//!
//! Supported types:
//! - string: UTF-8 string
//! - int: 64-bit signed integer
//! - float: 64-bit floating point
//! - bool: Boolean
//! - list: list of strings
//! - unknown: the first record held null, so no type could be inferred

use serde::Serialize;

use crate::record::{Record, Scalar};

/// Field types inferred from the first record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Int,
    Float,
    Bool,
    List,
    Unknown,
}

impl FieldType {
    /// Returns the type name for messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::List => "list",
            FieldType::Unknown => "unknown",
        }
    }

    /// Infers the type of a single value
    pub fn of(value: &Scalar) -> Self {
        match value {
            Scalar::Null => FieldType::Unknown,
            Scalar::Str(_) => FieldType::String,
            Scalar::Int(_) => FieldType::Int,
            Scalar::Float(_) => FieldType::Float,
            Scalar::Bool(_) => FieldType::Bool,
            Scalar::List(_) => FieldType::List,
        }
    }
}

/// A named, typed field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    pub name: String,
    pub field_type: FieldType,
}

/// Ordered set of fields shared by every record of one record set.
///
/// Derived once from the first record and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    fields: Vec<FieldDef>,
}

impl Schema {
    /// Schema of an empty record set
    pub fn empty() -> Self {
        Self::default()
    }

    /// Derives the schema from a record's keys and value kinds
    pub fn from_record(record: &Record) -> Self {
        Self {
            fields: record
                .iter()
                .map(|(name, value)| FieldDef {
                    name: name.to_string(),
                    field_type: FieldType::of(value),
                })
                .collect(),
        }
    }

    /// Derives the schema from the first record of a set
    pub fn from_records(records: &[Record]) -> Self {
        records.first().map(Self::from_record).unwrap_or_default()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.name == field)
    }

    pub fn field_type(&self, field: &str) -> Option<FieldType> {
        self.fields
            .iter()
            .find(|f| f.name == field)
            .map(|f| f.field_type)
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
