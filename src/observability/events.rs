//! Observability events
//!
//! Lifecycle events of loading data, planning and running queries, and
//! persisting results or saved queries. Events are explicit and typed.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration loaded
    ConfigLoaded,
    /// Source file parsed into records
    DatasetLoaded,
    /// Declared operators reordered into a plan
    QueryPlanned,
    /// Plan executed successfully
    QueryExecuted,
    /// Plan execution failed
    QueryFailed,
    /// Operator declaration rejected by the field validator
    FieldRejected,
    /// Result written to a sink
    ResultWritten,
    /// Operator list saved under a name
    QuerySaved,
    /// Saved operator list loaded into a builder
    QueryLoaded,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DatasetLoaded => "DATASET_LOADED",
            Event::QueryPlanned => "QUERY_PLANNED",
            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::QueryFailed => "QUERY_FAILED",
            Event::FieldRejected => "FIELD_REJECTED",
            Event::ResultWritten => "RESULT_WRITTEN",
            Event::QuerySaved => "QUERY_SAVED",
            Event::QueryLoaded => "QUERY_LOADED",
        }
    }

    /// Returns true if this event reports a rejected or failed operation
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::QueryFailed | Event::FieldRejected)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
