//! Pagination request and result types
//!
//! Requests are validated once at paginator entry; results serialize in the
//! shape request handlers hand back to clients (camelCase keys).

use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::{Error, Result};
use crate::types::{Document, DocumentId, Sort, SortDirection};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Largest skip or limit a store query may carry (SQL engines use signed 64-bit bounds)
pub const MAX_QUERY_BOUND: u64 = i64::MAX.unsigned_abs();

// ============================================================================
// Offset Mode
// ============================================================================

/// Offset-mode page request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OffsetRequest {
    /// 1-based page number
    pub page: u64,
    /// Documents per page
    pub per_page: u64,
    /// Optional field to order by
    pub sort_field: Option<String>,
    /// Direction applied to `sort_field`
    pub sort_direction: SortDirection,
}

impl Default for OffsetRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
            sort_field: None,
            sort_direction: SortDirection::Ascending,
        }
    }
}

impl OffsetRequest {
    /// Request a page of a given size
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page,
            per_page,
            ..Default::default()
        }
    }

    /// Order results by a field
    #[must_use]
    pub fn sort_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_field = Some(field.into());
        self.sort_direction = direction;
        self
    }

    /// Parse loosely typed request parameters
    ///
    /// Recognises `page`, `per_page`/`perPage`, `sort_field`/`sortField`
    /// and `sort_direction`/`sortDirection`. Missing values take defaults.
    pub fn from_params(params: &HashMap<String, String>, default_per_page: u64) -> Result<Self> {
        let page = match lookup(params, &["page"]) {
            Some(raw) => parse_positive("page", raw)?,
            None => 1,
        };
        let per_page = match lookup(params, &["per_page", "perPage"]) {
            Some(raw) => parse_positive("per_page", raw)?,
            None => default_per_page,
        };
        let sort_field = lookup(params, &["sort_field", "sortField"])
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(ToString::to_string);
        let sort_direction = match lookup(params, &["sort_direction", "sortDirection"]) {
            Some(raw) => raw.parse()?,
            None => SortDirection::Ascending,
        };

        let request = Self {
            page,
            per_page,
            sort_field,
            sort_direction,
        };
        request.validate()?;
        Ok(request)
    }

    /// Reject non-positive page numbers and sizes
    pub fn validate(&self) -> Result<()> {
        if self.page == 0 {
            return Err(Error::invalid_argument("page", "must be a positive integer"));
        }
        if self.per_page == 0 {
            return Err(Error::invalid_argument(
                "per_page",
                "must be a positive integer",
            ));
        }
        if self.per_page > MAX_QUERY_BOUND {
            return Err(Error::invalid_argument(
                "per_page",
                format!("must not exceed {MAX_QUERY_BOUND}"),
            ));
        }
        Ok(())
    }

    /// Number of documents to skip: `(page - 1) * per_page`
    pub fn skip(&self) -> Result<u64> {
        self.page
            .saturating_sub(1)
            .checked_mul(self.per_page)
            .filter(|skip| *skip <= MAX_QUERY_BOUND)
            .ok_or_else(|| {
                Error::invalid_argument(
                    "page",
                    format!("(page - 1) * per_page must not exceed {MAX_QUERY_BOUND}"),
                )
            })
    }

    /// Sort specification, if a field was requested
    pub fn sort(&self) -> Option<Sort> {
        self.sort_field.as_ref().map(|field| Sort {
            field: field.clone(),
            direction: self.sort_direction,
        })
    }
}

/// Link to a neighbouring page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    /// Target page number; `None` when there is no such page
    pub page: Option<u64>,
    /// Page size
    pub size: u64,
}

/// Neighbouring pages of an offset page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationLinks {
    /// Always present; `next.page` is `None` on the last page
    pub next: PageLink,
    /// Omitted entirely on the first page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLink>,
}

impl PaginationLinks {
    /// Compute links for `page` out of `total_pages`
    pub fn new(page: u64, per_page: u64, total_pages: u64) -> Self {
        Self {
            next: PageLink {
                page: (page < total_pages).then(|| page + 1),
                size: per_page,
            },
            prev: (page > 1).then(|| PageLink {
                page: Some(page - 1),
                size: per_page,
            }),
        }
    }
}

/// Offset-mode result page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetPage {
    /// Documents on this page
    pub results: Vec<Document>,
    /// Requested page number
    pub page: u64,
    /// Requested page size
    pub per_page: u64,
    /// Documents matching the filter (possibly cached)
    pub total: u64,
    /// `ceil(total / per_page)`
    pub total_pages: u64,
    /// Neighbouring pages
    pub pagination: PaginationLinks,
}

impl OffsetPage {
    /// Assemble a page from fetched documents and the total count
    pub fn new(results: Vec<Document>, request: &OffsetRequest, total: u64) -> Self {
        let total_pages = total.div_ceil(request.per_page);
        Self {
            results,
            page: request.page,
            per_page: request.per_page,
            total,
            total_pages,
            pagination: PaginationLinks::new(request.page, request.per_page, total_pages),
        }
    }

    /// Whether no later page exists
    pub fn is_terminal(&self) -> bool {
        self.pagination.next.page.is_none()
    }
}

// ============================================================================
// Cursor Mode
// ============================================================================

/// Cursor-mode page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorRequest {
    /// Identifier of the last document of the previous page; `None` for the first page
    pub cursor: Option<DocumentId>,
    /// Documents per page
    pub page_size: u64,
}

impl CursorRequest {
    /// First page of a traversal
    pub fn first(page_size: u64) -> Self {
        Self {
            cursor: None,
            page_size,
        }
    }

    /// Continue after a known identifier
    pub fn after(cursor: DocumentId, page_size: u64) -> Self {
        Self {
            cursor: Some(cursor),
            page_size,
        }
    }

    /// Build a request from a raw cursor token
    ///
    /// A malformed token fails with `InvalidCursor`; it is never treated as
    /// the first page.
    pub fn parse(cursor: Option<&str>, page_size: u64) -> Result<Self> {
        let cursor = cursor.map(str::parse::<DocumentId>).transpose()?;
        let request = Self { cursor, page_size };
        request.validate()?;
        Ok(request)
    }

    /// Parse loosely typed request parameters (`cursor`, `page_size`/`pageSize`)
    ///
    /// An empty `cursor` parameter means the first page.
    pub fn from_params(params: &HashMap<String, String>, default_page_size: u64) -> Result<Self> {
        let page_size = match lookup(params, &["page_size", "pageSize"]) {
            Some(raw) => parse_positive("page_size", raw)?,
            None => default_page_size,
        };
        let cursor = lookup(params, &["cursor"]).filter(|c| !c.is_empty());
        Self::parse(cursor, page_size)
    }

    /// Reject a zero page size, or one whose look-ahead fetch would not fit
    /// a store query
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::invalid_argument(
                "page_size",
                "must be a positive integer",
            ));
        }
        if self.page_size >= MAX_QUERY_BOUND {
            return Err(Error::invalid_argument(
                "page_size",
                format!("must be less than {MAX_QUERY_BOUND}"),
            ));
        }
        Ok(())
    }
}

/// Cursor-mode result page
///
/// Results are ordered newest first (descending identifier).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPage {
    /// Documents on this page, at most `page_size`
    pub results: Vec<Document>,
    /// Cursor for the following page, present iff `has_next`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// The request's cursor echoed back; absent on the first page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    /// Whether the store held more documents past this page
    pub has_next: bool,
}

impl CursorPage {
    /// Assemble a page from up to `page_size + 1` fetched documents
    ///
    /// The surplus document, if any, only signals that another page exists
    /// and is dropped.
    pub fn from_fetched(mut documents: Vec<Document>, request: &CursorRequest) -> Self {
        let page_size = usize::try_from(request.page_size).unwrap_or(usize::MAX);
        let has_next = documents.len() > page_size;
        if has_next {
            documents.truncate(page_size);
        }

        let next = if has_next {
            documents.last().map(|d| d.id.to_string())
        } else {
            None
        };

        Self {
            results: documents,
            next,
            previous: request.cursor.map(|c| c.to_string()),
            has_next,
        }
    }

    /// Cursor to request the following page with
    pub fn next_cursor(&self) -> Option<&str> {
        self.next.as_deref()
    }

    /// Whether this page ends the traversal
    pub fn is_terminal(&self) -> bool {
        !self.has_next
    }
}

// ============================================================================
// Parameter Parsing
// ============================================================================

fn lookup<'a>(params: &'a HashMap<String, String>, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .find_map(|name| params.get(*name))
        .map(String::as_str)
}

/// Parse a strictly positive integer, rejecting signs, decimals and zero
fn parse_positive(field: &str, raw: &str) -> Result<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::invalid_argument(
            field,
            format!("must be a positive integer, got '{raw}'"),
        ));
    }
    match trimmed.parse::<u64>() {
        Ok(0) => Err(Error::invalid_argument(
            field,
            format!("must be a positive integer, got '{raw}'"),
        )),
        Ok(value) => Ok(value),
        Err(_) => Err(Error::invalid_argument(
            field,
            format!("value '{raw}' is out of range"),
        )),
    }
}
