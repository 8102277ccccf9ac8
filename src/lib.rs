// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # docpage
//!
//! Pagination over ordered document stores, with a TTL caching layer.
//!
//! ## Features
//!
//! - **Offset Pagination**: page number + page size, cached total count
//! - **Cursor Pagination**: newest-first traversal by last-seen identifier, whole-page caching
//! - **Cache Gateway**: deterministic keys, fixed TTL, bypass switch, failures degrade to misses
//! - **Store Adapters**: in-memory and DuckDB-backed document stores
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docpage::{Filter, MemoryCache, MemoryStore, OffsetRequest, Pager, PaginationConfig, Result};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let store = MemoryStore::new("tickets");
//!     let pager = Pager::new(Arc::new(MemoryCache::new()), PaginationConfig::default())?;
//!
//!     // Offset mode: page 1 of 20 per page
//!     let page = pager
//!         .paginate_with_offset(&store, &Filter::new(), &OffsetRequest::new(1, 20))
//!         .await?;
//!
//!     // Cursor mode: follow `next` until `has_next` is false
//!     let mut cursor = None;
//!     loop {
//!         let page = pager
//!             .paginate_with_cursor(&store, &Filter::new(), cursor.as_deref(), 20)
//!             .await?;
//!         if !page.has_next {
//!             break;
//!         }
//!         cursor = page.next;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                           Pager                             │
//! │  paginate_with_offset()          paginate_with_cursor()     │
//! └─────────────────────────────────────────────────────────────┘
//!                │                              │
//! ┌──────────────┴──────────┐     ┌─────────────┴───────────────┐
//! │     OffsetPaginator     │     │      CursorPaginator        │
//! │  skip/limit, count key  │     │  id < cursor, size + 1      │
//! └─────────────────────────┘     └─────────────────────────────┘
//!                │                              │
//! ┌──────────────┴────────────┬─────────────────┴───────────────┐
//! │       CacheGateway        │          DocumentStore          │
//! │  MemoryCache / custom     │   MemoryStore / DuckDbStore     │
//! └───────────────────────────┴─────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types: documents, identifiers, filters, sorting
pub mod types;

/// Configuration
pub mod config;

/// Document store collaborator and adapters
pub mod store;

/// Cache collaborator, gateway and key derivation
pub mod cache;

/// Offset and cursor pagination strategies
pub mod pagination;

/// Combined entry point
pub mod pager;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use cache::{CacheGateway, CacheStore, MemoryCache};
pub use config::{CacheConfig, PaginationConfig};
pub use pager::Pager;
pub use pagination::{CursorPage, CursorRequest, OffsetPage, OffsetRequest};
pub use store::{DocumentStore, DuckDbStore, FindQuery, MemoryStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
