//! Field validator for operator declarations
//!
//! Validation semantics:
//! - Every referenced field must exist in the schema
//! - The first unknown field fails the whole declaration
//! - Unknown fields carry up to `max_suggestions` near matches, or the full
//!   field list when nothing is close enough
//!
//! Validation runs when an operator is declared, never at execute time.

use super::errors::{SchemaError, SchemaResult};
use super::similarity::close_matches;
use super::types::Schema;

/// Tuning knobs for suggestions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatorConfig {
    /// Maximum number of suggested field names
    pub max_suggestions: usize,
    /// Minimum similarity ratio for a suggestion
    pub similarity_cutoff: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_suggestions: 3,
            similarity_cutoff: 0.6,
        }
    }
}

/// Checks field references against a schema.
///
/// Validator does not mutate the schema. Validation is deterministic.
#[derive(Debug, Clone)]
pub struct FieldValidator {
    schema: Schema,
    config: ValidatorConfig,
}

impl FieldValidator {
    /// Creates a validator with default suggestion settings
    pub fn new(schema: Schema) -> Self {
        Self::with_config(schema, ValidatorConfig::default())
    }

    pub fn with_config(schema: Schema, config: ValidatorConfig) -> Self {
        Self { schema, config }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validates a set of requested field names.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` (RQ_UNKNOWN_FIELD) for the first field that is
    /// not part of the schema.
    pub fn validate<I, S>(&self, fields: I) -> SchemaResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for field in fields {
            self.validate_field(field.as_ref())?;
        }
        Ok(())
    }

    /// Validates a single field name
    pub fn validate_field(&self, field: &str) -> SchemaResult<()> {
        if self.schema.contains(field) {
            return Ok(());
        }

        let names = self.schema.field_names();
        let similar = close_matches(
            field,
            names.iter().map(String::as_str),
            self.config.max_suggestions,
            self.config.similarity_cutoff,
        );

        if similar.is_empty() {
            Err(SchemaError::unknown_field_no_match(field, names))
        } else {
            Err(SchemaError::unknown_field(field, similar))
        }
    }
}
