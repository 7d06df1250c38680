//! Wire types shared by the codec and the index engines.

use serde::{Deserialize, Serialize};

pub type DocId = String;

/// A value as the index stores it, before the codec gives it a Rust type.
///
/// Variant order matters for deserialization: numbers are tried first, then
/// strings, and anything else lands in `Other` so that decoding can report a
/// type mismatch instead of failing to parse the stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl WireValue {
    /// Short name of the variant, used in type mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "string",
            Self::Other(serde_json::Value::Null) => "null",
            Self::Other(serde_json::Value::Bool(_)) => "bool",
            Self::Other(serde_json::Value::Array(_)) => "array",
            Self::Other(serde_json::Value::Object(_)) => "object",
            // serde picks the typed variants before `Other` for these two
            Self::Other(serde_json::Value::Number(_)) => "number",
            Self::Other(serde_json::Value::String(_)) => "string",
        }
    }
}

/// A named unit of searchable text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: WireValue,
}

impl Field {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: WireValue::Text(value.into()) }
    }
}

/// A named attribute indexed apart from free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facet {
    pub name: String,
    pub value: WireValue,
}

impl Facet {
    pub fn number(name: impl Into<String>, value: f64) -> Self {
        Self { name: name.into(), value: WireValue::Number(value) }
    }
}

/// The field/facet pair a document is written as and read back from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncodedDocument {
    pub fields: Vec<Field>,
    pub facets: Vec<Facet>,
}

/// One query result before decoding.
///
/// `id` is the identifier the index assigned (or was given) on write.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub id: DocId,
    pub document: EncodedDocument,
}

/// Options for a query. The default returns every match.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Stop after this many results.
    pub limit: Option<usize>,
    /// Results fetched per round trip to the searcher; engine default when unset.
    pub page_size: Option<usize>,
}

/// Count of documents sharing one value of a facet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetCount {
    pub value: String,
    pub count: u64,
}
