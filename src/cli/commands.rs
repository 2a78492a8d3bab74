//! CLI command implementations
//!
//! Every command follows the same sequence: load configuration, read the
//! input export, run, write one response. Nothing is written on failure.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::executor::ExecutionResult;
use crate::ingest::{CsvReader, CsvWriter};
use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::planner::ExplainPlan;
use crate::query::QueryBuilder;
use crate::record::Record;
use crate::schema::{Schema, ValidatorConfig};
use crate::stats::{Report, RepositoryStats};

use super::args::{Cli, Command};
use super::document::QueryDocument;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_response, write_text};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Field delimiter of input and output files (optional, default ",")
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Minimum similarity for field-name suggestions (optional, default 0.6)
    #[serde(default = "default_similarity_cutoff")]
    pub similarity_cutoff: f64,

    /// Maximum number of suggestions (optional, default 3)
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    /// Row count for top-N reports (optional, default 10)
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_delimiter() -> String {
    ",".to_string()
}
fn default_similarity_cutoff() -> f64 {
    0.6
}
fn default_max_suggestions() -> usize {
    3
}
fn default_top_n() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            similarity_cutoff: default_similarity_cutoff(),
            max_suggestions: default_max_suggestions(),
            top_n: default_top_n(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        Self::from_json(&content)
    }

    /// Parse and validate configuration text
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.delimiter.len() != 1 || !self.delimiter.is_ascii() {
            return Err(CliError::config_error(format!(
                "Invalid delimiter: '{}'. Must be a single ASCII character.",
                self.delimiter
            )));
        }

        if !(self.similarity_cutoff > 0.0 && self.similarity_cutoff <= 1.0) {
            return Err(CliError::config_error(
                "similarity_cutoff must be in (0, 1]",
            ));
        }

        if self.max_suggestions == 0 {
            return Err(CliError::config_error("max_suggestions must be > 0"));
        }

        Ok(())
    }

    /// Delimiter as a byte; validation guarantees a single ASCII character
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter.as_bytes().first().copied().unwrap_or(b',')
    }

    /// Suggestion settings for field validation
    pub fn validator_config(&self) -> ValidatorConfig {
        ValidatorConfig {
            max_suggestions: self.max_suggestions,
            similarity_cutoff: self.similarity_cutoff,
        }
    }
}

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();

    // stdout carries the command response
    Logger::set_stdout_enabled(false);
    if cli.verbose {
        Logger::set_min_severity(Severity::Info);
    }

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let source = cli
        .config
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    log_event_with_fields(Event::ConfigLoaded, &[("source", source.as_str())]);

    run_command(cli.command, &config)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command, config: &Config) -> CliResult<()> {
    match cmd {
        Command::Columns { input } => columns(&input, config),
        Command::Summary { input } => summary(&input, config),
        Command::Report {
            report,
            input,
            output,
            top,
        } => run_report(report, &input, output.as_deref(), top, config),
        Command::Query { input, output } => query(&input, output.as_deref(), config),
        Command::Explain { input } => explain(&input, config),
    }
}

/// List the dataset's fields and inferred types
pub fn columns(input: &Path, config: &Config) -> CliResult<()> {
    let records = load_records(input, config)?;
    let schema = Schema::from_records(&records);

    write_response(serde_json::to_value(schema.fields())?)
}

/// Print summary figures for the dataset
pub fn summary(input: &Path, config: &Config) -> CliResult<()> {
    let mut reader = reader_for(input, config);
    reader.read()?;

    let summary = reader.summary();
    let median_size =
        RepositoryStats::with_config(reader.data(), config.validator_config()).median_size()?;

    write_response(json!({
        "summary": summary,
        "median_size": median_size,
    }))
}

/// Run a canned report, optionally writing its rows to `output`
pub fn run_report(
    report: Report,
    input: &Path,
    output: Option<&Path>,
    top: Option<usize>,
    config: &Config,
) -> CliResult<()> {
    let records = load_records(input, config)?;
    let stats = RepositoryStats::with_config(&records, config.validator_config());
    let rows = report.run(&stats, top.unwrap_or(config.top_n))?;

    if let Some(path) = output {
        write_rows(path, &rows, config)?;
    }

    write_response(json!({
        "report": report.as_str(),
        "rows": rows,
    }))
}

/// Execute a query document read from stdin
pub fn query(input: &Path, output: Option<&Path>, config: &Config) -> CliResult<()> {
    let document = QueryDocument::from_value(read_request()?)?;
    let result = execute_document(&document, input, output, config)?;

    write_response(serde_json::to_value(&result)?)
}

/// Explain a query document read from stdin without executing it
pub fn explain(input: &Path, config: &Config) -> CliResult<()> {
    let document = QueryDocument::from_value(read_request()?)?;
    let plan = explain_document(&document, input, config)?;

    write_text(&plan.to_string())
}

/// Runs `document` over the export at `input`, optionally writing the rows
pub fn execute_document(
    document: &QueryDocument,
    input: &Path,
    output: Option<&Path>,
    config: &Config,
) -> CliResult<ExecutionResult> {
    let mut builder = builder_for(input, config)?;

    document.apply(&mut builder)?;
    let result = builder.execute_detailed()?;

    if let Some(path) = output {
        write_rows(path, &result.records, config)?;
    }
    Ok(result)
}

/// Plans `document` against the export at `input`
pub fn explain_document(
    document: &QueryDocument,
    input: &Path,
    config: &Config,
) -> CliResult<ExplainPlan> {
    let mut builder = builder_for(input, config)?;

    document.apply(&mut builder)?;
    Ok(builder.explain())
}

fn reader_for(input: &Path, config: &Config) -> CsvReader {
    CsvReader::new(input).with_delimiter(config.delimiter_byte())
}

fn load_records(input: &Path, config: &Config) -> CliResult<Vec<Record>> {
    let mut reader = reader_for(input, config);
    reader.read()?;
    Ok(reader.into_data())
}

fn builder_for(input: &Path, config: &Config) -> CliResult<QueryBuilder> {
    let records = load_records(input, config)?;
    Ok(QueryBuilder::with_config(records, config.validator_config()))
}

fn write_rows(path: &Path, rows: &[Record], config: &Config) -> CliResult<()> {
    CsvWriter::new(path)
        .with_delimiter(config.delimiter_byte())
        .write(rows)?;
    Ok(())
}
