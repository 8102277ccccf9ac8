//! Pagination module
//!
//! Supports: Offset (page number + page size) and Cursor (last-seen identifier)
//!
//! # Overview
//!
//! Both strategies translate a request into one bounded store query and
//! consult the cache gateway first. They differ in what they cache and in
//! how they behave while the collection changes underneath them:
//!
//! - `OffsetPaginator` caches only the total count; page data is always
//!   fresh, but inserts and deletes shift documents across page boundaries.
//! - `CursorPaginator` caches whole pages keyed by continuation state; a
//!   traversal never repeats or skips documents that existed throughout it.

mod strategies;
mod types;

pub use strategies::{CursorPaginator, OffsetPaginator};
pub use types::{
    CursorPage, CursorRequest, OffsetPage, OffsetRequest, PageLink, PaginationLinks,
    MAX_QUERY_BOUND,
};
