//! CLI argument definitions using clap
//!
//! Commands:
//! - repoquery columns --input <csv>
//! - repoquery summary --input <csv>
//! - repoquery report <REPORT> --input <csv> [--output <csv>] [--top N]
//! - repoquery query --input <csv> [--output <csv>]   (query document on stdin)
//! - repoquery explain --input <csv>                  (query document on stdin)

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::stats::Report;

/// repoquery - chainable, deterministic queries over repository metadata
#[derive(Parser, Debug)]
#[command(name = "repoquery")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit INFO log lines
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the dataset's fields and inferred types
    Columns {
        /// Delimited repository export
        #[arg(long)]
        input: PathBuf,
    },

    /// Print dataset summary figures
    Summary {
        /// Delimited repository export
        #[arg(long)]
        input: PathBuf,
    },

    /// Run a canned report
    Report {
        /// Report to run
        #[arg(value_enum)]
        report: Report,

        /// Delimited repository export
        #[arg(long)]
        input: PathBuf,

        /// Also write the result as delimited text
        #[arg(long)]
        output: Option<PathBuf>,

        /// Row count for top-N reports (overrides config)
        #[arg(long)]
        top: Option<usize>,
    },

    /// Execute a query document read from stdin
    Query {
        /// Delimited repository export
        #[arg(long)]
        input: PathBuf,

        /// Also write the result as delimited text
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Explain a query document read from stdin
    Explain {
        /// Delimited repository export
        #[arg(long)]
        input: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report() {
        let cli = Cli::try_parse_from([
            "repoquery",
            "report",
            "top-forked",
            "--input",
            "repos.csv",
            "--top",
            "3",
            "--verbose",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Command::Report { report, top, .. } => {
                assert_eq!(report, Report::TopForked);
                assert_eq!(top, Some(3));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli =
            Cli::try_parse_from(["repoquery", "query", "--input", "r.csv", "--config", "c.json"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("c.json")));
    }
}
