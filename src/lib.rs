//! repoquery - chainable, deterministic queries over repository metadata
//!
//! Records are loaded once from a delimited export, declared operators are
//! validated against the inferred schema, reordered into a canonical plan,
//! and executed over a private copy of the data.
//!
//! ```no_run
//! use repoquery::{CsvReader, QueryBuilder};
//!
//! let mut reader = CsvReader::new("repositories.csv");
//! reader.read()?;
//!
//! let mut builder = QueryBuilder::new(reader.into_data());
//! builder.select(&["Name", "Stars"])?.sort("Stars", true)?.limit(10);
//! let top = builder.execute()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod executor;
pub mod ingest;
pub mod observability;
pub mod planner;
pub mod query;
pub mod record;
pub mod schema;
pub mod session;
pub mod stats;

pub use executor::{ExecutionResult, ExecutorError, PipelineExecutor, StepError};
pub use ingest::{CsvReader, CsvWriter, IngestError};
pub use planner::{Aggregation, Aggregations, Condition, ExplainPlan, Operator, Predicate};
pub use query::{QueryBuilder, QueryError};
pub use record::{Record, RecordSet, Scalar};
pub use schema::{Schema, SchemaError};
pub use session::{QuerySession, SessionError};
pub use stats::{Report, RepositoryStats};
