//! Declarative filter conditions
//!
//! Conditions describe a predicate as data, so it can be read from a query
//! document, validated against the schema and rendered by explain. They
//! compile into a [`Predicate`](super::Predicate).

use std::cmp::Ordering;
use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::record::{PredicateError, Record, Scalar};

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Neq => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }
}

/// A filter condition over record fields
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ConditionDoc")]
pub enum Condition {
    /// `field <op> value`
    Compare {
        field: String,
        op: CompareOp,
        value: Scalar,
    },
    /// Field is present and null
    IsNull { field: String },
    /// Field is present and not null
    NotNull { field: String },
    /// List field holds the item, or string field holds the substring
    Contains { field: String, value: String },
    /// String field matches a `%` / `_` wildcard pattern
    Like { field: String, pattern: String },
    /// Every nested condition holds
    All(Vec<Condition>),
}

impl Condition {
    pub fn eq(field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::compare(field, CompareOp::Eq, value)
    }

    pub fn neq(field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::compare(field, CompareOp::Neq, value)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::compare(field, CompareOp::Gt, value)
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::compare(field, CompareOp::Gte, value)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::compare(field, CompareOp::Lt, value)
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::compare(field, CompareOp::Lte, value)
    }

    pub fn compare(field: impl Into<String>, op: CompareOp, value: impl Into<Scalar>) -> Self {
        Condition::Compare {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn is_null(field: impl Into<String>) -> Self {
        Condition::IsNull {
            field: field.into(),
        }
    }

    pub fn not_null(field: impl Into<String>) -> Self {
        Condition::NotNull {
            field: field.into(),
        }
    }

    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Condition::Contains {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Condition::Like {
            field: field.into(),
            pattern: pattern.into(),
        }
    }

    /// Every field this condition reads
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Condition::Compare { field, .. }
            | Condition::IsNull { field }
            | Condition::NotNull { field }
            | Condition::Contains { field, .. }
            | Condition::Like { field, .. } => vec![field.as_str()],
            Condition::All(conditions) => conditions.iter().flat_map(|c| c.fields()).collect(),
        }
    }

    /// Evaluates the condition. A field absent from the record is an error.
    pub fn evaluate(&self, record: &Record) -> Result<bool, PredicateError> {
        match self {
            Condition::Compare { field, op, value } => {
                let actual = record.require(field)?;
                compare(field, actual, *op, value)
            }
            Condition::IsNull { field } => Ok(record.require(field)?.is_null()),
            Condition::NotNull { field } => Ok(!record.require(field)?.is_null()),
            Condition::Contains { field, value } => match record.require(field)? {
                Scalar::Null => Ok(false),
                Scalar::List(items) => Ok(items.iter().any(|item| item == value)),
                Scalar::Str(s) => Ok(s.contains(value.as_str())),
                other => Err(PredicateError::new(format!(
                    "contains on field '{}' needs a list or string, got {}",
                    field,
                    other.kind()
                ))),
            },
            Condition::Like { field, pattern } => match record.require(field)? {
                Scalar::Null => Ok(false),
                Scalar::Str(s) => Ok(matches_like_pattern(s, pattern)),
                other => Err(PredicateError::new(format!(
                    "like on field '{}' needs a string, got {}",
                    field,
                    other.kind()
                ))),
            },
            Condition::All(conditions) => {
                for condition in conditions {
                    if !condition.evaluate(record)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }
}

fn compare(field: &str, actual: &Scalar, op: CompareOp, expected: &Scalar) -> Result<bool, PredicateError> {
    Ok(match op {
        CompareOp::Eq => actual == expected,
        CompareOp::Neq => actual != expected,
        CompareOp::Gt => ordering(field, actual, expected)? == Some(Ordering::Greater),
        CompareOp::Gte => matches!(
            ordering(field, actual, expected)?,
            Some(Ordering::Greater | Ordering::Equal)
        ),
        CompareOp::Lt => ordering(field, actual, expected)? == Some(Ordering::Less),
        CompareOp::Lte => matches!(
            ordering(field, actual, expected)?,
            Some(Ordering::Less | Ordering::Equal)
        ),
    })
}

/// Ordering of two values; `None` when either is null (never matches)
fn ordering(field: &str, actual: &Scalar, expected: &Scalar) -> Result<Option<Ordering>, PredicateError> {
    if actual.is_null() || expected.is_null() {
        return Ok(None);
    }

    actual.compare(expected).map(Some).ok_or_else(|| {
        PredicateError::new(format!(
            "cannot compare field '{}' ({}) with {}",
            field,
            actual.kind(),
            expected.kind()
        ))
    })
}

/// LIKE pattern matching (`%` any sequence, `_` one char).
///
/// Greedy two-pointer scan that only ever backtracks to the last `%`, so
/// the cost is bounded by `value.len() * pattern.len()`.
fn matches_like_pattern(value: &str, pattern: &str) -> bool {
    let value: Vec<char> = value.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    let (mut v, mut p) = (0, 0);
    // Position of the last `%` and how far into `value` it currently reaches
    let mut last_wildcard: Option<(usize, usize)> = None;

    while v < value.len() {
        match pattern.get(p) {
            Some('%') => {
                last_wildcard = Some((p, v));
                p += 1;
            }
            Some('_') => {
                v += 1;
                p += 1;
            }
            Some(c) if *c == value[v] => {
                v += 1;
                p += 1;
            }
            _ => match last_wildcard {
                Some((star, reach)) => {
                    last_wildcard = Some((star, reach + 1));
                    p = star + 1;
                    v = reach + 1;
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|c| *c == '%')
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Compare { field, op, value } => {
                write!(f, "{} {} {}", field, op.as_str(), value)
            }
            Condition::IsNull { field } => write!(f, "{} is null", field),
            Condition::NotNull { field } => write!(f, "{} is not null", field),
            Condition::Contains { field, value } => write!(f, "{} contains {:?}", field, value),
            Condition::Like { field, pattern } => write!(f, "{} like {:?}", field, pattern),
            Condition::All(conditions) => {
                let parts: Vec<String> = conditions.iter().map(|c| c.to_string()).collect();
                write!(f, "({})", parts.join(" and "))
            }
        }
    }
}

/// Wire form of a condition inside a query document
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum ConditionDoc {
    Eq { field: String, value: Value },
    Neq { field: String, value: Value },
    Gt { field: String, value: Value },
    Gte { field: String, value: Value },
    Lt { field: String, value: Value },
    Lte { field: String, value: Value },
    IsNull { field: String },
    NotNull { field: String },
    Contains { field: String, value: String },
    Like { field: String, pattern: String },
    All { conditions: Vec<Condition> },
}

impl From<ConditionDoc> for Condition {
    fn from(doc: ConditionDoc) -> Self {
        match doc {
            ConditionDoc::Eq { field, value } => Condition::eq(field, &value),
            ConditionDoc::Neq { field, value } => Condition::neq(field, &value),
            ConditionDoc::Gt { field, value } => Condition::gt(field, &value),
            ConditionDoc::Gte { field, value } => Condition::gte(field, &value),
            ConditionDoc::Lt { field, value } => Condition::lt(field, &value),
            ConditionDoc::Lte { field, value } => Condition::lte(field, &value),
            ConditionDoc::IsNull { field } => Condition::IsNull { field },
            ConditionDoc::NotNull { field } => Condition::NotNull { field },
            ConditionDoc::Contains { field, value } => Condition::Contains { field, value },
            ConditionDoc::Like { field, pattern } => Condition::Like { field, pattern },
            ConditionDoc::All { conditions } => Condition::All(conditions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn repo(language: Scalar, stars: i64) -> Record {
        Record::from_pairs([
            ("Name", Scalar::str("aerodb")),
            ("Language", language),
            ("Stars", Scalar::Int(stars)),
            ("Topics", Scalar::list(["database", "rust"])),
        ])
    }

    #[test]
    fn test_eq_and_neq() {
        let record = repo(Scalar::str("Rust"), 10);

        assert!(Condition::eq("Language", "Rust").evaluate(&record).unwrap());
        assert!(!Condition::eq("Language", "Go").evaluate(&record).unwrap());
        assert!(Condition::neq("Language", "Go").evaluate(&record).unwrap());
    }

    #[test]
    fn test_range_comparisons() {
        let record = repo(Scalar::str("Rust"), 10);

        assert!(Condition::gt("Stars", 5i64).evaluate(&record).unwrap());
        assert!(Condition::gte("Stars", 10i64).evaluate(&record).unwrap());
        assert!(!Condition::lt("Stars", 10i64).evaluate(&record).unwrap());
        assert!(Condition::lte("Stars", 10.5).evaluate(&record).unwrap());
    }

    #[test]
    fn test_null_checks() {
        let record = repo(Scalar::Null, 1);

        assert!(Condition::is_null("Language").evaluate(&record).unwrap());
        assert!(!Condition::not_null("Language").evaluate(&record).unwrap());
        assert!(!Condition::gt("Language", "A").evaluate(&record).unwrap());
    }

    #[test]
    fn test_absent_field_is_error() {
        let record = repo(Scalar::Null, 1);
        assert!(Condition::is_null("License").evaluate(&record).is_err());
    }

    #[test]
    fn test_incomparable_kinds_is_error() {
        let record = repo(Scalar::str("Rust"), 1);
        assert!(Condition::gt("Stars", "many").evaluate(&record).is_err());
    }

    #[test]
    fn test_contains_list_and_string() {
        let record = repo(Scalar::str("Rust"), 1);

        assert!(Condition::contains("Topics", "rust").evaluate(&record).unwrap());
        assert!(!Condition::contains("Topics", "go").evaluate(&record).unwrap());
        assert!(Condition::contains("Name", "db").evaluate(&record).unwrap());
    }

    #[test]
    fn test_like_filter() {
        let record = repo(Scalar::str("Rust"), 1);

        assert!(Condition::like("Name", "%db").evaluate(&record).unwrap());
        assert!(Condition::like("Name", "aero__").evaluate(&record).unwrap());
        assert!(!Condition::like("Name", "db%").evaluate(&record).unwrap());
        assert!(Condition::like("Name", "%").evaluate(&record).unwrap());
        assert!(Condition::like("Name", "a%r%b").evaluate(&record).unwrap());
        assert!(!Condition::like("Name", "aerodb_").evaluate(&record).unwrap());
    }

    #[test]
    fn test_like_many_wildcards_stays_linear() {
        let record = Record::from_pairs([("Name", Scalar::str("a".repeat(400)))]);
        let pattern = format!("{}b", "%a".repeat(40));

        let start = std::time::Instant::now();
        let matched = Condition::like("Name", pattern).evaluate(&record).unwrap();

        assert!(!matched);
        assert!(start.elapsed() < std::time::Duration::from_secs(1));
    }

    #[test]
    fn test_all_conjunction() {
        let record = repo(Scalar::str("Rust"), 10);
        let cond = Condition::All(vec![
            Condition::eq("Language", "Rust"),
            Condition::gte("Stars", 5i64),
        ]);

        assert!(cond.evaluate(&record).unwrap());
        assert_eq!(cond.fields(), vec!["Language", "Stars"]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Condition::is_null("Language").to_string(), "Language is null");
        assert_eq!(Condition::gte("Stars", 100i64).to_string(), "Stars >= 100");
    }

    #[test]
    fn test_deserialize_from_document() {
        let cond: Condition = serde_json::from_value(json!({
            "op": "all",
            "conditions": [
                {"op": "is_null", "field": "Language"},
                {"op": "gte", "field": "Stars", "value": 100}
            ]
        }))
        .unwrap();

        assert_eq!(
            cond,
            Condition::All(vec![
                Condition::is_null("Language"),
                Condition::gte("Stars", 100i64),
            ])
        );
    }
}
