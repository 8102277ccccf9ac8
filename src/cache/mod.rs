//! Cache module
//!
//! Provides:
//! - `CacheStore` - the external key-value collaborator with TTL expiry
//! - `MemoryCache` - an in-process `CacheStore` built on moka
//! - `CacheGateway` - TTL, bypass and failure policy over a store
//! - key derivation for both pagination modes

mod gateway;
mod key;
mod memory;
mod types;

pub use gateway::CacheGateway;
pub use key::{
    cursor_page_key, derive_key, offset_count_key, CURSOR_PAGE_NAMESPACE, OFFSET_COUNT_NAMESPACE,
};
pub use memory::{MemoryCache, DEFAULT_MAX_ENTRIES};
pub use types::{CacheEntry, CacheResult, CacheStore};

#[cfg(test)]
mod tests;
