//! CSV Round-Trip Tests
//!
//! Writing a record set and reading it back yields equal records:
//! - integers stay integers
//! - booleans stay booleans
//! - tag lists re-split
//! - empty cells come back as null

use repoquery::ingest::{repository_columns, IngestError};
use repoquery::{CsvReader, CsvWriter, QueryBuilder, Record, Scalar};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn full_repo(name: &str, stars: i64, language: Option<&str>, topics: &[&str]) -> Record {
    Record::from_pairs([
        ("Name", Scalar::str(name)),
        ("Description", Scalar::str(format!("{}, a \"sample\" project", name))),
        ("URL", Scalar::str(format!("https://github.com/example/{}", name))),
        ("Created At", Scalar::str("2020-01-01T00:00:00Z")),
        ("Updated At", Scalar::str("2024-06-01T12:30:00Z")),
        ("Homepage", Scalar::Null),
        ("Size", Scalar::Int(2048)),
        ("Stars", Scalar::Int(stars)),
        ("Forks", Scalar::Int(stars / 4)),
        ("Issues", Scalar::Int(3)),
        ("Watchers", Scalar::Int(stars)),
        ("Language", Scalar::from(language)),
        ("License", Scalar::str("MIT")),
        ("Topics", topics_cell(topics)),
        ("Has Issues", Scalar::Bool(true)),
        ("Has Projects", Scalar::Bool(false)),
        ("Has Downloads", Scalar::Bool(true)),
        ("Has Wiki", Scalar::Bool(false)),
        ("Has Pages", Scalar::Bool(false)),
        ("Has Discussions", Scalar::Bool(true)),
        ("Is Fork", Scalar::Bool(false)),
        ("Is Archived", Scalar::Bool(false)),
        ("Is Template", Scalar::Bool(false)),
        ("Default Branch", Scalar::str("main")),
    ])
}

// An empty tag list renders as an empty cell, which reads back as null
fn topics_cell(topics: &[&str]) -> Scalar {
    if topics.is_empty() {
        Scalar::Null
    } else {
        Scalar::list(topics.iter().copied())
    }
}

fn records() -> Vec<Record> {
    vec![
        full_repo("ripgrep", 45000, Some("Rust"), &["cli", "search"]),
        full_repo("dotfiles", 12, None, &[]),
        full_repo("hugo", 70000, Some("Go"), &["static-site"]),
    ]
}

// =============================================================================
// Round trip
// =============================================================================

/// Test: every one of the 24 columns survives write → read.
#[test]
fn test_roundtrip_all_columns() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("repos.csv");

    CsvWriter::new(&path).write(&records()).unwrap();

    let mut reader = CsvReader::new(&path);
    let read_back = reader.read().unwrap();

    assert_eq!(read_back.len(), 3);
    assert_eq!(read_back[0].len(), repository_columns().len());
    assert_eq!(read_back, records().as_slice());
}

/// Test: a custom delimiter is honored on both sides.
#[test]
fn test_roundtrip_with_semicolon() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("repos.csv");

    CsvWriter::new(&path)
        .with_delimiter(b';')
        .write(&records())
        .unwrap();

    let mut reader = CsvReader::new(&path).with_delimiter(b';');
    assert_eq!(reader.read().unwrap(), records().as_slice());
}

/// Test: a query result written out can be loaded as a dataset again.
#[test]
fn test_query_result_written_and_reloaded() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("repos.csv");
    let result = tmp.path().join("top.csv");
    CsvWriter::new(&source).write(&records()).unwrap();

    let mut reader = CsvReader::new(&source);
    reader.read().unwrap();
    let mut builder = QueryBuilder::new(reader.into_data());
    builder
        .sort("Stars", true)
        .unwrap()
        .select(&["Name", "Stars", "Topics"])
        .unwrap()
        .limit(2);
    let top = builder.execute().unwrap();

    CsvWriter::new(&result).write(&top).unwrap();
    let mut reader = CsvReader::new(&result).with_columns(Vec::new());
    let reloaded = reader.read().unwrap();

    // Without expected columns every cell reads back as text
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded[0].get("Name"), Some(&Scalar::str("hugo")));
    assert_eq!(reloaded[0].get("Stars"), Some(&Scalar::str("70000")));
    assert_eq!(reloaded[1].get("Topics"), Some(&Scalar::str("cli,search")));
}

// =============================================================================
// Failure cases
// =============================================================================

/// Test: writing nothing is an error and creates no file.
#[test]
fn test_empty_write_rejected() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("empty.csv");

    let err = CsvWriter::new(&path).write(&[]).unwrap_err();

    assert!(matches!(err, IngestError::EmptyInput));
    assert!(!path.exists());
}

/// Test: a missing file is reported as such.
#[test]
fn test_missing_file() {
    let tmp = TempDir::new().unwrap();
    let mut reader = CsvReader::new(tmp.path().join("absent.csv"));

    assert!(matches!(reader.read(), Err(IngestError::NotFound(_))));
}

/// Test: missing columns are listed, sorted, before any row is parsed.
#[test]
fn test_missing_columns_reported() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("partial.csv");
    std::fs::write(&path, "Name,Stars\nripgrep,not-a-number\n").unwrap();

    let mut reader = CsvReader::new(&path);
    match reader.read() {
        Err(IngestError::MissingColumns(missing)) => {
            assert_eq!(missing.len(), repository_columns().len() - 2);
            let mut sorted = missing.clone();
            sorted.sort();
            assert_eq!(missing, sorted);
            assert!(!missing.iter().any(|c| c == "Name" || c == "Stars"));
        }
        other => panic!("expected MissingColumns, got {:?}", other),
    }
}
