//! Cache key derivation
//!
//! A key is the canonical JSON rendering of the request's logical inputs:
//! model identity, filter and mode-specific parameters. Object keys are sorted
//! at every depth, so logically equal requests share a key whatever order
//! their filter was built in, and JSON quoting keeps distinct inputs apart.

use crate::types::{canonical_json, DocumentId, Filter, JsonValue};
use serde_json::json;

/// Namespace for cached offset-mode totals
pub const OFFSET_COUNT_NAMESPACE: &str = "pagination:offset:count";

/// Namespace for cached cursor-mode pages
pub const CURSOR_PAGE_NAMESPACE: &str = "pagination:cursor:page";

/// Derive a key from model identity, filter and extra parameters
pub fn derive_key(model: &str, filter: &Filter, params: &JsonValue) -> String {
    canonical_json(&json!({
        "model": model,
        "filter": filter.0,
        "params": params,
    }))
}

/// Key for the total count of `filter` over `model`
pub fn offset_count_key(model: &str, filter: &Filter) -> String {
    derive_key(model, filter, &JsonValue::Null)
}

/// Key for one cursor page
pub fn cursor_page_key(
    model: &str,
    filter: &Filter,
    cursor: Option<DocumentId>,
    page_size: u64,
) -> String {
    derive_key(
        model,
        filter,
        &json!({
            "cursor": cursor.map(DocumentId::get),
            "page_size": page_size,
        }),
    )
}
