//! Query documents
//!
//! The JSON form of a query accepted on stdin by `query` and `explain`:
//!
//! ```json
//! {
//!   "where": [{"op": "gte", "field": "Stars", "value": 100}],
//!   "group_by": {"field": "Language", "aggregations": {"Stars": "average"}},
//!   "sort": [{"field": "Stars", "descending": true}],
//!   "select": ["Language", "Stars"],
//!   "limit": 5
//! }
//! ```
//!
//! Every section is optional. Section order in the document is irrelevant:
//! the builder plans the canonical order regardless.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::planner::{AggregationName, Aggregations, Condition};
use crate::query::QueryBuilder;
use crate::schema::SchemaResult;

use super::errors::{CliError, CliResult};

/// Grouping section of a query document
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupBySection {
    pub field: String,
    #[serde(default)]
    pub aggregations: BTreeMap<String, AggregationName>,
}

/// One sort key of a query document
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SortSection {
    pub field: String,
    #[serde(default)]
    pub descending: bool,
}

/// Parsed query document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryDocument {
    #[serde(default, rename = "where")]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub group_by: Option<GroupBySection>,
    #[serde(default)]
    pub sort: Vec<SortSection>,
    #[serde(default)]
    pub select: Option<Vec<String>>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl QueryDocument {
    /// Parse a document from an already decoded JSON value
    pub fn from_value(value: Value) -> CliResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| CliError::invalid_request(format!("Invalid query document: {}", e)))
    }

    /// Declares every section on `builder`.
    ///
    /// Stops at the first field the builder rejects; operators declared
    /// before it stay pending.
    pub fn apply(&self, builder: &mut QueryBuilder) -> SchemaResult<()> {
        for condition in &self.conditions {
            builder.filter_condition(condition.clone())?;
        }

        if let Some(group) = &self.group_by {
            let mut aggregations = Aggregations::new();
            for (field, name) in &group.aggregations {
                aggregations.insert(field.as_str(), (*name).into());
            }
            builder.group_by(&group.field, aggregations)?;
        }

        for key in &self.sort {
            builder.sort(&key.field, key.descending)?;
        }

        if let Some(fields) = &self.select {
            builder.select(fields.as_slice())?;
        }

        if let Some(count) = self.limit {
            builder.limit(count);
        }

        Ok(())
    }
}
