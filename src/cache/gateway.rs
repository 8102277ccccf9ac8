//! Cache policy layer
//!
//! Wraps a [`CacheStore`] with the crate's caching policy: a fixed TTL,
//! typed (de)serialization and a bypass switch. A failing cache store never
//! fails a request; lookups degrade to misses and writes are dropped.

use super::types::CacheStore;
use crate::config::CacheConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Cache gateway shared by both paginators
#[derive(Clone)]
pub struct CacheGateway {
    /// Backing store, absent when no cache was configured
    store: Option<Arc<dyn CacheStore>>,
    /// Policy settings
    config: CacheConfig,
}

impl std::fmt::Debug for CacheGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheGateway")
            .field("has_store", &self.store.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl CacheGateway {
    /// Create a gateway over a cache store
    pub fn new(store: Arc<dyn CacheStore>, config: CacheConfig) -> Self {
        Self {
            store: Some(store),
            config,
        }
    }

    /// Gateway that never caches
    pub fn disabled() -> Self {
        Self {
            store: None,
            config: CacheConfig::disabled(),
        }
    }

    /// Whether lookups and writes reach the store
    pub fn is_enabled(&self) -> bool {
        self.config.allow_cache && self.store.is_some()
    }

    /// Configured entry lifetime
    pub fn ttl_seconds(&self) -> u64 {
        self.config.ttl_seconds
    }

    /// Policy settings
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Look up a typed value
    ///
    /// Returns `None` when caching is bypassed, the entry is absent, the
    /// store fails, or the stored value does not decode as `T`.
    pub async fn get<T: DeserializeOwned>(&self, namespace: &str, key: &str) -> Option<T> {
        if !self.config.allow_cache {
            return None;
        }
        let store = self.store.as_ref()?;

        match store.get(namespace, key).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(decoded) => {
                    debug!(namespace, key, "cache hit");
                    Some(decoded)
                }
                Err(e) => {
                    warn!(namespace, key, "Discarding undecodable cache entry: {e}");
                    None
                }
            },
            Ok(None) => {
                debug!(namespace, key, "cache miss");
                None
            }
            Err(e) => {
                warn!(namespace, key, "Cache lookup failed, treating as miss: {e}");
                None
            }
        }
    }

    /// Store a typed value with the configured TTL
    pub async fn put<T: Serialize>(&self, namespace: &str, key: &str, value: &T) {
        self.put_with_ttl(namespace, key, value, self.config.ttl_seconds)
            .await;
    }

    /// Store a typed value with an explicit TTL
    pub async fn put_with_ttl<T: Serialize>(
        &self,
        namespace: &str,
        key: &str,
        value: &T,
        ttl_seconds: u64,
    ) {
        if !self.config.allow_cache {
            return;
        }
        let Some(store) = self.store.as_ref() else {
            return;
        };

        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                warn!(namespace, key, "Failed to serialize cache value: {e}");
                return;
            }
        };

        match store.put(namespace, key, value, ttl_seconds).await {
            Ok(()) => debug!(namespace, key, ttl_seconds, "cache write"),
            Err(e) => warn!(namespace, key, "Cache write failed, dropping entry: {e}"),
        }
    }
}
