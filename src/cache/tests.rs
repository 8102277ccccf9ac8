//! Tests for cache module

use super::*;
use crate::config::CacheConfig;
use crate::types::{DocumentId, Filter, JsonObject};
use chrono::{TimeZone, Utc};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Key Derivation Tests
// ============================================================================

#[test]
fn test_key_is_independent_of_filter_key_order() {
    let a = Filter::new().with("status", "open").with("owner", "ana");

    let mut map = JsonObject::new();
    map.insert("owner".into(), json!("ana"));
    map.insert("status".into(), json!("open"));
    let b = Filter(map);

    assert_eq!(offset_count_key("tickets", &a), offset_count_key("tickets", &b));
    assert_eq!(
        cursor_page_key("tickets", &a, Some(DocumentId(9)), 2),
        cursor_page_key("tickets", &b, Some(DocumentId(9)), 2)
    );
}

#[test]
fn test_distinct_requests_get_distinct_keys() {
    let filter = Filter::new().with("status", "open");

    let keys = [
        offset_count_key("tickets", &filter),
        offset_count_key("users", &filter),
        offset_count_key("tickets", &Filter::new()),
        offset_count_key("tickets", &Filter::new().with("status", "closed")),
        cursor_page_key("tickets", &filter, None, 2),
        cursor_page_key("tickets", &filter, Some(DocumentId(9)), 2),
        cursor_page_key("tickets", &filter, Some(DocumentId(9)), 3),
        cursor_page_key("tickets", &filter, Some(DocumentId(8)), 2),
    ];

    for (i, a) in keys.iter().enumerate() {
        for b in &keys[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_key_quoting_prevents_collisions() {
    // A model name containing separators must not alias another model/filter pair
    let a = offset_count_key("a\",\"filter\":{}", &Filter::new());
    let b = offset_count_key("a", &Filter::new());
    assert_ne!(a, b);
}

// ============================================================================
// CacheEntry Tests
// ============================================================================

#[test]
fn test_cache_entry_expiry() {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let entry = CacheEntry::new("ns", "k", json!(1), now, 60);

    assert!(!entry.is_expired(now));
    assert!(!entry.is_expired(now + chrono::TimeDelta::seconds(59)));
    assert!(entry.is_expired(now + chrono::TimeDelta::seconds(60)));

    let forever = CacheEntry::new("ns", "k", json!(1), now, u64::MAX);
    assert!(!forever.is_expired(now + chrono::TimeDelta::days(365 * 100)));
}

// ============================================================================
// MemoryCache Tests
// ============================================================================

#[tokio::test]
async fn test_memory_cache_get_put() {
    let cache = MemoryCache::new();

    assert_eq!(cache.get("ns", "k").await.unwrap(), None);
    cache.put("ns", "k", json!({"total": 5}), 60).await.unwrap();
    assert_eq!(cache.get("ns", "k").await.unwrap(), Some(json!({"total": 5})));

    // namespaces are separate
    assert_eq!(cache.get("other", "k").await.unwrap(), None);

    assert_eq!(cache.hits(), 1);
    assert_eq!(cache.misses(), 2);
    assert_eq!(cache.writes(), 1);
}

#[tokio::test]
async fn test_memory_cache_expires_by_ttl() {
    let cache = MemoryCache::new();

    cache.put("ns", "short", json!(1), 1).await.unwrap();
    cache.put("ns", "long", json!(2), 60).await.unwrap();
    assert_eq!(cache.get("ns", "short").await.unwrap(), Some(json!(1)));

    tokio::time::sleep(Duration::from_millis(1200)).await;

    assert_eq!(cache.get("ns", "short").await.unwrap(), None);
    assert_eq!(cache.get("ns", "long").await.unwrap(), Some(json!(2)));
}

#[tokio::test]
async fn test_memory_cache_evicts_expired_keys_never_read_again() {
    let cache = MemoryCache::new();

    for i in 0..200 {
        cache.put("ns", &format!("cursor-{i}"), json!(i), 1).await.unwrap();
    }
    assert_eq!(cache.len().await, 200);

    tokio::time::sleep(Duration::from_millis(1200)).await;

    for i in 0..10 {
        cache.put("ns", &format!("fresh-{i}"), json!(i), 60).await.unwrap();
    }
    assert_eq!(cache.len().await, 10);
}

#[tokio::test]
async fn test_memory_cache_is_bounded() {
    let cache = MemoryCache::with_max_entries(50);

    for i in 0..500 {
        cache.put("ns", &format!("k{i}"), json!(i), 60).await.unwrap();
    }
    assert!(cache.len().await <= 50);
}

#[tokio::test]
async fn test_memory_cache_overwrite_takes_new_ttl() {
    let cache = MemoryCache::new();

    cache.put("ns", "k", json!(1), 1).await.unwrap();
    cache.put("ns", "k", json!(2), 60).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1200)).await;

    assert_eq!(cache.get("ns", "k").await.unwrap(), Some(json!(2)));
    assert_eq!(cache.entry("ns", "k").await.unwrap().ttl_seconds, 60);
}

#[tokio::test]
async fn test_memory_cache_offline() {
    let cache = MemoryCache::new();
    cache.set_available(false);

    assert!(cache.get("ns", "k").await.is_err());
    assert!(cache.put("ns", "k", json!(1), 60).await.is_err());
}

// ============================================================================
// CacheGateway Tests
// ============================================================================

#[tokio::test]
async fn test_gateway_round_trip_uses_configured_ttl() {
    let cache = Arc::new(MemoryCache::new());
    let gateway = CacheGateway::new(cache.clone(), CacheConfig::default().with_ttl(90));

    assert!(gateway.is_enabled());
    gateway.put("ns", "k", &42_u64).await;
    assert_eq!(gateway.get::<u64>("ns", "k").await, Some(42));

    let entry = cache.entry("ns", "k").await.unwrap();
    assert_eq!(entry.ttl_seconds, 90);
    let remaining = entry.expires_at.signed_duration_since(Utc::now()).num_seconds();
    assert!((85..=90).contains(&remaining), "{remaining}");
}

#[tokio::test]
async fn test_gateway_bypass() {
    let cache = Arc::new(MemoryCache::new());
    let gateway = CacheGateway::new(cache.clone(), CacheConfig::disabled());

    assert!(!gateway.is_enabled());
    gateway.put("ns", "k", &1_u64).await;
    assert!(cache.is_empty().await);

    cache.put("ns", "k", json!(1), 60).await.unwrap();
    assert_eq!(gateway.get::<u64>("ns", "k").await, None);
    assert_eq!(cache.hits() + cache.misses(), 0);

    let none = CacheGateway::disabled();
    none.put("ns", "k", &1_u64).await;
    assert_eq!(none.get::<u64>("ns", "k").await, None);
}

#[tokio::test]
async fn test_gateway_degrades_on_cache_failure() {
    let cache = Arc::new(MemoryCache::new());
    let gateway = CacheGateway::new(cache.clone(), CacheConfig::default());

    cache.set_available(false);
    gateway.put("ns", "k", &1_u64).await;
    assert_eq!(gateway.get::<u64>("ns", "k").await, None);

    cache.set_available(true);
    assert!(cache.is_empty().await);
}

#[tokio::test]
async fn test_gateway_discards_undecodable_entry() {
    let cache = Arc::new(MemoryCache::new());
    let gateway = CacheGateway::new(cache.clone(), CacheConfig::default());

    cache.put("ns", "k", json!("not a number"), 60).await.unwrap();
    assert_eq!(gateway.get::<u64>("ns", "k").await, None);
}
