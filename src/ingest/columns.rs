//! Expected repository export columns and cell coercion

use serde::Serialize;

use crate::record::Scalar;

/// How a raw cell is turned into a scalar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Kept as text
    Text,
    /// Non-negative integer; anything but ASCII digits becomes null
    Count,
    /// true for `true`, `1`, `yes`, `y` (any case), false otherwise
    Flag,
    /// Comma-separated list of trimmed tags
    TagList,
}

impl ColumnKind {
    /// Coerces one raw cell. An empty cell is always null.
    pub fn coerce(&self, raw: &str) -> Scalar {
        if raw.is_empty() {
            return Scalar::Null;
        }

        match self {
            ColumnKind::Text => Scalar::str(raw),
            ColumnKind::Count => {
                if raw.bytes().all(|b| b.is_ascii_digit()) {
                    raw.parse::<i64>().map(Scalar::Int).unwrap_or(Scalar::Null)
                } else {
                    Scalar::Null
                }
            }
            ColumnKind::Flag => {
                let lowered = raw.to_lowercase();
                Scalar::Bool(matches!(lowered.as_str(), "true" | "1" | "yes" | "y"))
            }
            ColumnKind::TagList => Scalar::list(raw.split(',').map(str::trim)),
        }
    }
}

/// One expected column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// The 24 columns of a repository metadata export, in export order
pub fn repository_columns() -> Vec<ColumnSpec> {
    use ColumnKind::*;

    [
        ("Name", Text),
        ("Description", Text),
        ("URL", Text),
        ("Created At", Text),
        ("Updated At", Text),
        ("Homepage", Text),
        ("Size", Count),
        ("Stars", Count),
        ("Forks", Count),
        ("Issues", Count),
        ("Watchers", Count),
        ("Language", Text),
        ("License", Text),
        ("Topics", TagList),
        ("Has Issues", Flag),
        ("Has Projects", Flag),
        ("Has Downloads", Flag),
        ("Has Wiki", Flag),
        ("Has Pages", Flag),
        ("Has Discussions", Flag),
        ("Is Fork", Flag),
        ("Is Archived", Flag),
        ("Is Template", Flag),
        ("Default Branch", Text),
    ]
    .into_iter()
    .map(|(name, kind)| ColumnSpec::new(name, kind))
    .collect()
}
