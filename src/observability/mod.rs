//! Observability subsystem
//!
//! Provides:
//! - Structured logging (JSON)
//! - Per-builder metrics
//! - Lifecycle event tracing
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on query results
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use repoquery::observability::{Logger, Event, MetricsRegistry, ObservationScope};
//!
//! Logger::info("QUERY_EXECUTED", &[("returned", "42")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.record_execution(100, 42);
//!
//! let scope = ObservationScope::new("QUERY");
//! scope.complete();
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{LogTarget, Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::{ObservationScope, Timer};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Severity and stream of a lifecycle event's log line.
///
/// Failures also reach the caller as errors, so their line is INFO on
/// stderr: hidden by default and never mixed into command output.
pub fn event_route(event: Event) -> (Severity, LogTarget) {
    if event.is_failure() {
        (Severity::Info, LogTarget::Stderr)
    } else {
        (Severity::Info, Logger::target_for(Severity::Info))
    }
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let (severity, target) = event_route(event);
    Logger::log_to(target, severity, event.as_str(), fields);
}
