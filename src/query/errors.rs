//! Query facade errors

use thiserror::Error;

use crate::executor::ExecutorError;
use crate::schema::SchemaError;

/// Result type for callers chaining declaration and execution
pub type QueryResult<T> = Result<T, QueryError>;

/// Either phase of a query failing
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// A declaration referenced an unknown field
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// An operator failed during execution
    #[error(transparent)]
    Execution(#[from] ExecutorError),
}

impl QueryError {
    /// Returns the coded error string of the underlying error
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::Schema(err) => err.code().code(),
            QueryError::Execution(err) => err.code().code(),
        }
    }
}
