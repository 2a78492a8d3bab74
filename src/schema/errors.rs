//! Schema error types
//!
//! Error codes:
//! - RQ_UNKNOWN_FIELD (REJECT)

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Declaration rejected, builder state unchanged
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Operator references a field absent from the schema
    RqUnknownField,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::RqUnknownField => "RQ_UNKNOWN_FIELD",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with full context
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    /// Error code
    code: SchemaErrorCode,
    /// Human-readable message
    message: String,
    /// Offending field name
    field: String,
    /// Near matches, best first (empty when nothing was close)
    suggestions: Vec<String>,
    /// Full field list, filled only when there are no suggestions
    available: Vec<String>,
}

impl SchemaError {
    /// Unknown field with at least one close match
    pub fn unknown_field(field: impl Into<String>, suggestions: Vec<String>) -> Self {
        let field = field.into();
        Self {
            code: SchemaErrorCode::RqUnknownField,
            message: format!(
                "Field '{}' does not exist in the data. Did you mean: {}",
                field,
                suggestions.join(", ")
            ),
            field,
            suggestions,
            available: Vec::new(),
        }
    }

    /// Unknown field with nothing close; lists the whole schema instead
    pub fn unknown_field_no_match(field: impl Into<String>, available: Vec<String>) -> Self {
        let field = field.into();
        Self {
            code: SchemaErrorCode::RqUnknownField,
            message: format!(
                "Field '{}' does not exist in the data. Available fields: {}",
                field,
                available.join(", ")
            ),
            field,
            suggestions: Vec::new(),
            available,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the rejected field name
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the suggested near matches
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Returns the schema field list (only when no suggestion was found)
    pub fn available(&self) -> &[String] {
        &self.available
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
