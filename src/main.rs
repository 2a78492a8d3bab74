//! repoquery CLI entry point
//!
//! Parses arguments, dispatches to the CLI module, writes failures to stderr
//! as a JSON error response and exits with non-zero. All logic lives in the
//! CLI module.

use repoquery::cli;

fn main() {
    if let Err(e) = cli::run() {
        if cli::write_error(e.code_str(), e.message()).is_err() {
            eprintln!("{}", e);
        }
        std::process::exit(1);
    }
}
