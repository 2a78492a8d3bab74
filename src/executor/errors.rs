//! Executor error types
//!
//! Error codes:
//! - RQ_OPERATION_FAILED (ERROR)
//!
//! Execution stops at the first failing operator. The error names the
//! operator kind, its 1-based position in the plan, and the cause.

use std::fmt;

use crate::planner::{AggregateError, OperatorKind};
use crate::record::{PredicateError, ValueKind};

/// Severity levels for executor errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation failed, inputs and builder remain usable
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Executor-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorErrorCode {
    /// An operator failed while transforming the working set
    RqOperationFailed,
}

impl ExecutorErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorErrorCode::RqOperationFailed => "RQ_OPERATION_FAILED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

impl fmt::Display for ExecutorErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Underlying reason a single operator failed
#[derive(Debug, Clone, PartialEq)]
pub enum StepError {
    /// A filter predicate raised
    Predicate(PredicateError),
    /// An aggregation could not reduce a group's values
    Aggregate {
        field: String,
        source: AggregateError,
    },
    /// A record lacks the field an operator needs
    MissingField { field: String },
    /// Sort column holds values of more than one kind
    MixedKinds {
        field: String,
        first: ValueKind,
        second: ValueKind,
    },
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepError::Predicate(err) => write!(f, "predicate failed: {}", err),
            StepError::Aggregate { field, source } => {
                write!(f, "aggregation on '{}' failed: {}", field, source)
            }
            StepError::MissingField { field } => {
                write!(f, "field '{}' is absent from a record", field)
            }
            StepError::MixedKinds {
                field,
                first,
                second,
            } => write!(
                f,
                "field '{}' mixes {} and {} values and cannot be ordered",
                field, first, second
            ),
        }
    }
}

impl std::error::Error for StepError {}

impl From<PredicateError> for StepError {
    fn from(err: PredicateError) -> Self {
        StepError::Predicate(err)
    }
}

/// Executor error type with full context
#[derive(Debug, Clone)]
pub struct ExecutorError {
    code: ExecutorErrorCode,
    operator: OperatorKind,
    position: usize,
    cause: StepError,
}

impl ExecutorError {
    /// Create an operation failed error for the operator at `position` (1-based)
    pub fn operation_failed(operator: OperatorKind, position: usize, cause: StepError) -> Self {
        Self {
            code: ExecutorErrorCode::RqOperationFailed,
            operator,
            position,
            cause,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ExecutorErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the kind of the failing operator
    pub fn operator(&self) -> OperatorKind {
        self.operator
    }

    /// Returns the 1-based plan position of the failing operator
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the underlying cause
    pub fn cause(&self) -> &StepError {
        &self.cause
    }

    /// Returns the error message
    pub fn message(&self) -> String {
        format!(
            "{} operation (step {}) failed: {}",
            self.operator, self.position, self.cause
        )
    }
}

impl fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message()
        )
    }
}

impl std::error::Error for ExecutorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;
