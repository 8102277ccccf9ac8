//! Public pagination entry point
//!
//! [`Pager`] bundles both strategies around one cache gateway and one
//! configuration, so request handlers only hold a single value.

use crate::cache::{CacheGateway, CacheStore};
use crate::config::PaginationConfig;
use crate::error::Result;
use crate::pagination::{
    CursorPage, CursorPaginator, CursorRequest, OffsetPage, OffsetPaginator, OffsetRequest,
};
use crate::store::DocumentStore;
use crate::types::Filter;
use std::collections::HashMap;
use std::sync::Arc;

/// Offset and cursor pagination sharing one cache policy
#[derive(Debug, Clone)]
pub struct Pager {
    offset: OffsetPaginator,
    cursor: CursorPaginator,
    config: PaginationConfig,
}

impl Pager {
    /// Create a pager caching through `cache`
    pub fn new(cache: Arc<dyn CacheStore>, config: PaginationConfig) -> Result<Self> {
        config.validate()?;
        let gateway = CacheGateway::new(cache, config.cache.clone());
        Ok(Self::with_gateway(gateway, config))
    }

    /// Create a pager that never caches
    pub fn uncached() -> Self {
        let mut config = PaginationConfig::default();
        config.cache.allow_cache = false;
        Self::with_gateway(CacheGateway::disabled(), config)
    }

    fn with_gateway(gateway: CacheGateway, config: PaginationConfig) -> Self {
        Self {
            offset: OffsetPaginator::new(gateway.clone()),
            cursor: CursorPaginator::new(gateway),
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Fetch one offset page
    pub async fn paginate_with_offset<S>(
        &self,
        store: &S,
        filter: &Filter,
        request: &OffsetRequest,
    ) -> Result<OffsetPage>
    where
        S: DocumentStore + ?Sized,
    {
        self.offset.paginate(store, filter, request).await
    }

    /// Fetch one cursor page from a raw cursor token
    pub async fn paginate_with_cursor<S>(
        &self,
        store: &S,
        filter: &Filter,
        cursor: Option<&str>,
        page_size: u64,
    ) -> Result<CursorPage>
    where
        S: DocumentStore + ?Sized,
    {
        self.cursor.paginate_raw(store, filter, cursor, page_size).await
    }

    /// Fetch one cursor page from a parsed request
    pub async fn paginate_cursor_request<S>(
        &self,
        store: &S,
        filter: &Filter,
        request: &CursorRequest,
    ) -> Result<CursorPage>
    where
        S: DocumentStore + ?Sized,
    {
        self.cursor.paginate(store, filter, request).await
    }

    /// Parse offset parameters, defaulting `per_page` from configuration
    pub fn offset_request(&self, params: &HashMap<String, String>) -> Result<OffsetRequest> {
        OffsetRequest::from_params(params, self.config.default_per_page)
    }

    /// Parse cursor parameters, defaulting `page_size` from configuration
    pub fn cursor_request(&self, params: &HashMap<String, String>) -> Result<CursorRequest> {
        CursorRequest::from_params(params, self.config.default_page_size)
    }
}
