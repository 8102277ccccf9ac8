//! Document store abstractions
//!
//! Defines the collaborator interface both paginators query through.

use crate::error::StoreError;
use crate::types::{canonical_json, Document, DocumentId, Filter, JsonValue, Sort, SortDirection};
use async_trait::async_trait;
use std::cmp::Ordering;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A bounded find request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindQuery {
    /// Caller's filter, passed through unmodified
    pub filter: Filter,
    /// Only documents whose identifier is strictly lower than this
    pub before: Option<DocumentId>,
    /// Optional ordering; identifier order ascending when absent
    pub sort: Option<Sort>,
    /// Number of matching documents to skip
    pub skip: u64,
    /// Maximum number of documents to return
    pub limit: Option<u64>,
}

impl FindQuery {
    /// Create a query over a filter
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }

    /// Restrict to identifiers strictly lower than `id`
    #[must_use]
    pub fn before(mut self, id: Option<DocumentId>) -> Self {
        self.before = id;
        self
    }

    /// Set ordering
    #[must_use]
    pub fn sort(mut self, sort: Option<Sort>) -> Self {
        self.sort = sort;
        self
    }

    /// Set skip count
    #[must_use]
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    /// Set limit
    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Ordered document store collaborator
///
/// Implementations must give a monotonic, repeatable ordering by identifier
/// for a fixed filter.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Identity of the collection/model, used in cache keys
    fn model_name(&self) -> &str;

    /// Count documents matching a filter
    async fn count(&self, filter: &Filter) -> StoreResult<u64>;

    /// Find documents matching a query, honouring sort, skip and limit
    async fn find(&self, query: &FindQuery) -> StoreResult<Vec<Document>>;
}

/// Ordering used when sorting on a document field
///
/// Missing and null values sort first, then booleans, numbers, strings and
/// finally arrays/objects. Ties fall back to the identifier in the same
/// direction. The order among arrays and objects is adapter-specific; this
/// store compares their canonical JSON.
pub(crate) fn compare_documents(a: &Document, b: &Document, sort: &Sort) -> Ordering {
    let ordering = compare_values(a.field(&sort.field).as_ref(), b.field(&sort.field).as_ref())
        .then_with(|| a.id.cmp(&b.id));
    match sort.direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

fn rank(value: Option<&JsonValue>) -> u8 {
    match value {
        None | Some(JsonValue::Null) => 0,
        Some(JsonValue::Bool(_)) => 1,
        Some(JsonValue::Number(_)) => 2,
        Some(JsonValue::String(_)) => 3,
        Some(JsonValue::Array(_) | JsonValue::Object(_)) => 4,
    }
}

fn compare_values(a: Option<&JsonValue>, b: Option<&JsonValue>) -> Ordering {
    rank(a).cmp(&rank(b)).then_with(|| match (a, b) {
        (Some(JsonValue::Bool(x)), Some(JsonValue::Bool(y))) => x.cmp(y),
        (Some(JsonValue::Number(x)), Some(JsonValue::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.total_cmp(&y)
        }
        (Some(JsonValue::String(x)), Some(JsonValue::String(y))) => x.cmp(y),
        (Some(x), Some(y)) if rank(a) == 4 => canonical_json(x).cmp(&canonical_json(y)),
        _ => Ordering::Equal,
    })
}
