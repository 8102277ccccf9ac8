//! Cache store abstractions
//!
//! The cache store is an external collaborator exposing a namespaced
//! key-value API with TTL-based expiry. Expiry is the store's job.

use crate::error::CacheError;
use crate::types::JsonValue;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result type for cache operations
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Key-value store with TTL expiry
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch a live value, or `None` when absent or expired
    async fn get(&self, namespace: &str, key: &str) -> CacheResult<Option<JsonValue>>;

    /// Store a value that expires after `ttl_seconds`
    async fn put(
        &self,
        namespace: &str,
        key: &str,
        value: JsonValue,
        ttl_seconds: u64,
    ) -> CacheResult<()>;
}

/// A stored cache value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Namespace the key lives in
    pub namespace: String,
    /// Derived cache key
    pub key: String,
    /// Cached payload
    pub value: JsonValue,
    /// Lifetime requested by the writer
    pub ttl_seconds: u64,
    /// Instant after which the entry is no longer served
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Create an entry expiring `ttl_seconds` after `now`
    pub fn new(
        namespace: impl Into<String>,
        key: impl Into<String>,
        value: JsonValue,
        now: DateTime<Utc>,
        ttl_seconds: u64,
    ) -> Self {
        let ttl = chrono::TimeDelta::try_seconds(i64::try_from(ttl_seconds).unwrap_or(i64::MAX))
            .unwrap_or(chrono::TimeDelta::MAX);
        Self {
            namespace: namespace.into(),
            key: key.into(),
            value,
            ttl_seconds,
            expires_at: now
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Whether the entry has expired at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
