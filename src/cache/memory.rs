//! In-process TTL cache
//!
//! Backed by a bounded [`moka::future::Cache`]. Every entry carries its own
//! lifetime through `PerEntryTtl`, and moka evicts expired entries on its
//! own maintenance cycle, so keys that are never read again do not pile up.

use super::types::{CacheEntry, CacheResult, CacheStore};
use crate::error::CacheError;
use crate::types::JsonValue;
use async_trait::async_trait;
use chrono::Utc;
use moka::future::Cache;
use moka::Expiry;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Default maximum number of live entries
pub const DEFAULT_MAX_ENTRIES: u64 = 10_000;

/// Longest lifetime handed to moka; larger TTLs are clamped
const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

type EntryKey = (String, String);

/// Expires each entry after the TTL it was written with
#[derive(Debug, Clone, Copy, Default)]
struct PerEntryTtl;

impl PerEntryTtl {
    fn lifetime(entry: &CacheEntry) -> Duration {
        Duration::from_secs(entry.ttl_seconds).min(MAX_TTL)
    }
}

impl Expiry<EntryKey, CacheEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &EntryKey,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(Self::lifetime(value))
    }

    fn expire_after_update(
        &self,
        _key: &EntryKey,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(Self::lifetime(value))
    }
}

/// Cache store held in memory
pub struct MemoryCache {
    /// Entries keyed by (namespace, key)
    entries: Cache<EntryKey, CacheEntry>,
    hits: AtomicUsize,
    misses: AtomicUsize,
    writes: AtomicUsize,
    /// When false, every operation fails
    available: AtomicBool,
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entry_count", &self.entries.entry_count())
            .field("hits", &self.hits())
            .field("misses", &self.misses())
            .field("writes", &self.writes())
            .finish_non_exhaustive()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCache {
    /// Create a cache holding up to [`DEFAULT_MAX_ENTRIES`] entries
    pub fn new() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }

    /// Create a cache with a custom capacity
    pub fn with_max_entries(max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(PerEntryTtl)
            .build();

        Self {
            entries,
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
            available: AtomicBool::new(true),
        }
    }

    /// Number of live entries, after pending evictions are applied
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    /// Whether the cache holds no live entries
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Inspect a live entry without touching the counters
    pub async fn entry(&self, namespace: &str, key: &str) -> Option<CacheEntry> {
        self.entries
            .get(&(namespace.to_string(), key.to_string()))
            .await
    }

    /// Lookups that returned a live value
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Lookups that found nothing live
    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::SeqCst)
    }

    /// Successful writes
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Take the cache on- or offline
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> CacheResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CacheError::new("memory cache is offline"))
        }
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, namespace: &str, key: &str) -> CacheResult<Option<JsonValue>> {
        self.ensure_available()?;

        let value = self
            .entries
            .get(&(namespace.to_string(), key.to_string()))
            .await
            .map(|entry| entry.value);

        if value.is_some() {
            self.hits.fetch_add(1, Ordering::SeqCst);
        } else {
            self.misses.fetch_add(1, Ordering::SeqCst);
        }
        Ok(value)
    }

    async fn put(
        &self,
        namespace: &str,
        key: &str,
        value: JsonValue,
        ttl_seconds: u64,
    ) -> CacheResult<()> {
        self.ensure_available()?;

        let entry = CacheEntry::new(namespace, key, value, Utc::now(), ttl_seconds);
        self.entries
            .insert((namespace.to_string(), key.to_string()), entry)
            .await;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
