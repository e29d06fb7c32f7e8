//! Typed field values.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::vocabulary::VocabularyTerm;

/// Value of a single canonical field.
///
/// Serialized adjacently tagged, e.g. `{"kind": "text", "value": "..."}`, so a
/// serialized record reads back without guessing at types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Timestamp(DateTime<Utc>),
    Term(VocabularyTerm),
    /// Ordered group of values, one unit's contribution to a cumulative field.
    List(Vec<FieldValue>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_term(&self) -> Option<&VocabularyTerm> {
        match self {
            FieldValue::Term(term) => Some(term),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

impl From<VocabularyTerm> for FieldValue {
    fn from(value: VocabularyTerm) -> Self {
        FieldValue::Term(value)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(value: Vec<FieldValue>) -> Self {
        FieldValue::List(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(value) => f.write_str(value),
            FieldValue::Timestamp(value) => {
                f.write_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            FieldValue::Term(term) => write!(f, "{term}"),
            FieldValue::List(items) => {
                let rendered: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
        }
    }
}
