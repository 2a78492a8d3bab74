//! JSON I/O handling for CLI
//!
//! - Input: one JSON query document via stdin
//! - Output: one JSON object via stdout, or plain text for explain
//! - Errors: one JSON object via stderr
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read a JSON request from stdin. The document may span several lines.
pub fn read_request() -> CliResult<Value> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;
    parse_request(&input)
}

/// Parse a JSON request
pub fn parse_request(input: &str) -> CliResult<Value> {
    if input.trim().is_empty() {
        return Err(CliError::invalid_request("Empty input"));
    }
    serde_json::from_str(input)
        .map_err(|e| CliError::invalid_request(format!("Invalid JSON: {}", e)))
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    write_json_line(&mut io::stdout(), &response)
}

/// Build an error response
pub fn error_response(code: &str, message: &str) -> Value {
    serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    })
}

/// Write an error response to stderr
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_json_line(&mut io::stderr(), &error_response(code, message))
}

/// Write one JSON value followed by a newline
pub fn write_json_line<W: Write>(writer: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}

/// Write plain text to stdout
pub fn write_text(text: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    write!(stdout, "{}", text)?;
    stdout.flush()?;

    Ok(())
}
