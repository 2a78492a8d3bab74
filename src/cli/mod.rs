//! CLI module for repoquery
//!
//! Provides command-line interface for:
//! - columns: List fields and their types
//! - summary: Dataset summary figures
//! - report: Canned repository reports
//! - query: One-shot query execution from a JSON document
//! - explain: One-shot explain of a JSON document

mod args;
mod commands;
mod document;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    columns, execute_document, explain, explain_document, query, run, run_command, run_report,
    summary, Config,
};
pub use document::{GroupBySection, QueryDocument, SortSection};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{
    error_response, parse_request, read_request, write_error, write_json_line, write_response,
    write_text,
};
