//! Raw source records as they arrive, before normalisation.
//!
//! Every field is optional: sources are free to omit or mistype anything,
//! and extraction from JSON never fails.

use serde::Serialize;
use serde_json::Value;

/// A raw record from any source, tagged with its origin.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    /// Disease Ontology metadata record and the code it was looked up by.
    Ontology { code: String, record: RawOntologyRecord },
    /// Term corpus row and its position in the corpus.
    Term { index: usize, record: RawTermRecord },
}

/// Disease Ontology metadata (`name`, `synonyms`, `def`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawOntologyRecord {
    pub name: Option<String>,
    pub synonyms: Option<Vec<String>>,
    pub definition: Option<String>,
}

impl RawOntologyRecord {
    /// Field-by-field extraction; wrong-typed fields read as absent and
    /// non-string synonyms are dropped.
    pub fn from_value(json: &Value) -> Self {
        Self {
            name: json["name"].as_str().map(String::from),
            synonyms: json["synonyms"].as_array().map(|arr| {
                arr.iter()
                    .filter_map(|s| s.as_str().map(String::from))
                    .collect()
            }),
            definition: json["def"].as_str().map(String::from),
        }
    }
}

/// One row of a multilingual term corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawTermRecord {
    pub query: Option<String>,
    pub text: Option<String>,
    pub language: Option<String>,
    pub reference_id: Option<String>,
}

impl RawTermRecord {
    pub fn from_value(json: &Value) -> Self {
        Self {
            query: non_blank(&json["query"]),
            text: non_blank(&json["text"]),
            language: non_blank(&json["lang"]).or_else(|| non_blank(&json["language"])),
            reference_id: scalar_id(&json["id"]).or_else(|| scalar_id(&json["_id"])),
        }
    }
}

/// Per-item result of a fetch, kept alongside the entities so callers can
/// see which lookups failed without scraping logs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ItemOutcome {
    Fetched { code: String, name: String },
    Failed { code: String, error: String },
}

impl ItemOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ItemOutcome::Failed { .. })
    }
}

fn non_blank(v: &Value) -> Option<String> {
    v.as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn scalar_id(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
