//! Common types used throughout docpage
//!
//! Documents, their identifiers, filters and sort specifications shared by
//! the store adapters, the cache gateway and both paginators.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Field name under which a document's identifier is exposed
pub const ID_FIELD: &str = "id";

// ============================================================================
// Document Identifier
// ============================================================================

/// Strictly-ordered unique document identifier
///
/// Identifiers are monotonic: a larger identifier was inserted later. Their
/// string form (plain decimal digits) doubles as the cursor token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub u64);

impl DocumentId {
    /// Raw numeric value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for DocumentId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for DocumentId {
    type Err = Error;

    /// Parse a cursor token. Only the canonical decimal form is accepted:
    /// no sign, whitespace, exponent or leading zero. Every accepted token
    /// therefore prints back unchanged.
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::invalid_cursor(s));
        }
        if s.len() > 1 && s.starts_with('0') {
            return Err(Error::invalid_cursor(s));
        }
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| Error::invalid_cursor(s))
    }
}

// ============================================================================
// Document
// ============================================================================

/// A document returned by a store
///
/// Serializes as a flat JSON object with the identifier under [`ID_FIELD`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier
    pub id: DocumentId,
    /// Remaining document fields
    #[serde(flatten)]
    pub body: JsonObject,
}

impl Document {
    /// Create a document from an identifier and a JSON body.
    ///
    /// Non-object bodies are stored under a `value` field. An `id` key inside
    /// the body is dropped in favour of `id`.
    pub fn new(id: u64, body: JsonValue) -> Self {
        let mut body = match body {
            JsonValue::Object(map) => map,
            JsonValue::Null => JsonObject::new(),
            other => {
                let mut map = JsonObject::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        body.remove(ID_FIELD);
        Self {
            id: DocumentId(id),
            body,
        }
    }

    /// Look up a field, exposing the identifier as [`ID_FIELD`]
    pub fn field(&self, name: &str) -> Option<JsonValue> {
        if name == ID_FIELD {
            Some(JsonValue::from(self.id.0))
        } else {
            self.body.get(name).cloned()
        }
    }
}

// ============================================================================
// Filter
// ============================================================================

/// Opaque predicate passed through to the document store
///
/// The paginators never interpret a filter; they only serialize it for cache
/// key derivation. The bundled stores treat each entry as a top-level field
/// equality predicate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter(pub JsonObject);

impl Filter {
    /// Empty filter matching every document
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality predicate
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Build a filter from a JSON value, which must be an object (or null)
    pub fn from_value(value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Object(map) => Ok(Self(map)),
            JsonValue::Null => Ok(Self::new()),
            other => Err(Error::invalid_argument(
                "filter",
                format!("expected a JSON object, got {other}"),
            )),
        }
    }

    /// Whether the filter has no predicates
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(field, expected value)` predicates
    pub fn predicates(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.0.iter()
    }

    /// Whether a document satisfies every predicate
    ///
    /// Numbers compare by value, so `1` and `1.0` are equal. Every other
    /// value must match exactly.
    pub fn matches(&self, document: &Document) -> bool {
        self.0.iter().all(|(field, expected)| {
            document
                .field(field)
                .is_some_and(|actual| field_equals(&actual, expected))
        })
    }

    /// Deterministic serialization with object keys sorted at every depth
    pub fn canonical_json(&self) -> String {
        canonical_json(&JsonValue::Object(self.0.clone()))
    }
}

fn field_equals(actual: &JsonValue, expected: &JsonValue) -> bool {
    match (actual, expected) {
        (JsonValue::Number(a), JsonValue::Number(b)) => a.as_f64() == b.as_f64(),
        _ => actual == expected,
    }
}

/// Serialize a JSON value with object keys sorted recursively
///
/// The output does not depend on insertion order, so logically equal values
/// always produce the same string.
pub fn canonical_json(value: &JsonValue) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &JsonValue, out: &mut String) {
    match value {
        JsonValue::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&JsonValue::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        JsonValue::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

// ============================================================================
// Sorting
// ============================================================================

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// SQL keyword for this direction
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "ascending"),
            SortDirection::Descending => write!(f, "descending"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" | "1" => Ok(Self::Ascending),
            "desc" | "descending" | "-1" => Ok(Self::Descending),
            _ => Err(Error::invalid_argument(
                "sort_direction",
                format!("expected ascending or descending, got '{s}'"),
            )),
        }
    }
}

/// Sort specification applied by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    /// Field to order by
    pub field: String,
    /// Direction
    #[serde(default)]
    pub direction: SortDirection,
}

impl Sort {
    /// Ascending sort on a field
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Descending sort on a field
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}
