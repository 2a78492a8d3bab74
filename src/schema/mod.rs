//! Schema subsystem for repoquery
//!
//! The schema is derived once from the first record of a record set and is
//! immutable afterwards. Every field referenced by a declared operator is
//! checked against it immediately.
//!
//! # Design Principles
//!
//! - Fail fast: unknown fields are rejected at declaration time
//! - Helpful: rejections carry near-match suggestions
//! - Deterministic validation

mod errors;
mod similarity;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use similarity::{close_matches, levenshtein, similarity_ratio};
pub use types::{FieldDef, FieldType, Schema};
pub use validator::{FieldValidator, ValidatorConfig};
