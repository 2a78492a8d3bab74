//! Session store errors

use thiserror::Error;
use uuid::Uuid;

use crate::executor::ExecutorError;

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Session store errors
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("No query builder set for this session")]
    NoBuilder,

    #[error("No pending operators to save")]
    NothingToSave,

    #[error("Saved query not found: {0}")]
    NotFound(Uuid),

    #[error("Saved query named '{0}' not found")]
    NameNotFound(String),

    #[error(transparent)]
    Execution(#[from] ExecutorError),
}
