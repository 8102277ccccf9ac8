//! Document store module
//!
//! The store is an external collaborator: paginators only see the
//! [`DocumentStore`] trait. Two adapters ship with the crate:
//!
//! - `MemoryStore` - in-process, instrumented, used by tests and embedders
//! - `DuckDbStore` - embedded DuckDB with documents kept as JSON text

mod database;
mod memory;
mod types;

pub use database::DuckDbStore;
pub use memory::MemoryStore;
pub use types::{DocumentStore, FindQuery, StoreResult};
