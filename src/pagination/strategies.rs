//! Pagination strategy implementations
//!
//! Both paginators are stateless apart from the shared cache gateway and are
//! safe to call concurrently. Concurrent misses on the same key may both
//! query the store and both write back; the writes carry the same value.

use super::types::{CursorPage, CursorRequest, OffsetPage, OffsetRequest};
use crate::cache::{
    cursor_page_key, offset_count_key, CacheGateway, CURSOR_PAGE_NAMESPACE,
    OFFSET_COUNT_NAMESPACE,
};
use crate::error::{Error, Result};
use crate::store::{DocumentStore, FindQuery};
use crate::types::{Filter, Sort, ID_FIELD};
use tracing::debug;

// ============================================================================
// Offset Pagination
// ============================================================================

/// Offset-based pagination
///
/// Translates `(page, per_page)` into `skip`/`limit`. Only the total count is
/// cached, keyed by model and filter; page data is fetched fresh on every
/// call. The cached total is not invalidated by writes, so `total`,
/// `total_pages` and `next` may lag the collection for up to one TTL.
#[derive(Debug, Clone)]
pub struct OffsetPaginator {
    cache: CacheGateway,
}

impl OffsetPaginator {
    /// Create an offset paginator
    pub fn new(cache: CacheGateway) -> Self {
        Self { cache }
    }

    /// Fetch one page
    pub async fn paginate<S>(
        &self,
        store: &S,
        filter: &Filter,
        request: &OffsetRequest,
    ) -> Result<OffsetPage>
    where
        S: DocumentStore + ?Sized,
    {
        request.validate()?;
        let skip = request.skip()?;

        let total = self.total(store, filter).await?;

        let query = FindQuery::new(filter.clone())
            .sort(request.sort())
            .skip(skip)
            .limit(request.per_page);

        debug!(
            model = store.model_name(),
            skip,
            limit = request.per_page,
            "fetching offset page"
        );
        let results = store.find(&query).await?;

        Ok(OffsetPage::new(results, request, total))
    }

    /// Total matching documents, served from cache when possible
    async fn total<S>(&self, store: &S, filter: &Filter) -> Result<u64>
    where
        S: DocumentStore + ?Sized,
    {
        let key = offset_count_key(store.model_name(), filter);
        if let Some(total) = self.cache.get::<u64>(OFFSET_COUNT_NAMESPACE, &key).await {
            return Ok(total);
        }

        let total = store.count(filter).await?;
        self.cache.put(OFFSET_COUNT_NAMESPACE, &key, &total).await;
        Ok(total)
    }
}

// ============================================================================
// Cursor Pagination
// ============================================================================

/// Cursor-based pagination, newest first
///
/// Fetches `page_size + 1` documents below the cursor in descending
/// identifier order; the extra document only signals that another page
/// exists. Whole pages are cached under (model, filter, cursor, page size).
/// A cached page may hand out a `next` cursor whose documents were deleted
/// since; following it simply yields whatever now lies below that cursor.
#[derive(Debug, Clone)]
pub struct CursorPaginator {
    cache: CacheGateway,
}

impl CursorPaginator {
    /// Create a cursor paginator
    pub fn new(cache: CacheGateway) -> Self {
        Self { cache }
    }

    /// Fetch one page
    pub async fn paginate<S>(
        &self,
        store: &S,
        filter: &Filter,
        request: &CursorRequest,
    ) -> Result<CursorPage>
    where
        S: DocumentStore + ?Sized,
    {
        request.validate()?;
        let limit = request
            .page_size
            .checked_add(1)
            .ok_or_else(|| Error::invalid_argument("page_size", "too large"))?;

        let key = cursor_page_key(store.model_name(), filter, request.cursor, request.page_size);
        if let Some(page) = self.cache.get::<CursorPage>(CURSOR_PAGE_NAMESPACE, &key).await {
            return Ok(page);
        }

        let query = FindQuery::new(filter.clone())
            .before(request.cursor)
            .sort(Some(Sort::descending(ID_FIELD)))
            .limit(limit);

        debug!(
            model = store.model_name(),
            cursor = ?request.cursor,
            limit,
            "fetching cursor page"
        );
        let documents = store.find(&query).await?;

        let page = CursorPage::from_fetched(documents, request);
        self.cache.put(CURSOR_PAGE_NAMESPACE, &key, &page).await;
        Ok(page)
    }

    /// Fetch one page from a raw cursor token
    ///
    /// The token is parsed before any cache or store access.
    pub async fn paginate_raw<S>(
        &self,
        store: &S,
        filter: &Filter,
        cursor: Option<&str>,
        page_size: u64,
    ) -> Result<CursorPage>
    where
        S: DocumentStore + ?Sized,
    {
        let request = CursorRequest::parse(cursor, page_size)?;
        self.paginate(store, filter, &request).await
    }
}
