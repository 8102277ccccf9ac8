//! In-process document store
//!
//! Keeps documents ordered by identifier. Tracks how many count/find calls it
//! served and can be switched offline, which makes it the store of choice for
//! exercising cache behaviour and failure propagation.

use super::types::{compare_documents, DocumentStore, FindQuery, StoreResult};
use crate::error::StoreError;
use crate::types::{Document, DocumentId, Filter};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Document store held in memory
#[derive(Debug)]
pub struct MemoryStore {
    /// Model identity
    model: String,
    /// Documents keyed by identifier
    documents: RwLock<BTreeMap<DocumentId, Document>>,
    /// Number of count calls served
    count_calls: AtomicUsize,
    /// Number of find calls served
    find_calls: AtomicUsize,
    /// When false, every operation fails
    available: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store for a model
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_documents(model, Vec::new())
    }

    /// Create a store pre-populated with documents
    pub fn with_documents(model: impl Into<String>, documents: Vec<Document>) -> Self {
        let documents = documents.into_iter().map(|d| (d.id, d)).collect();
        Self {
            model: model.into(),
            documents: RwLock::new(documents),
            count_calls: AtomicUsize::new(0),
            find_calls: AtomicUsize::new(0),
            available: AtomicBool::new(true),
        }
    }

    /// Insert or replace a document
    pub async fn insert(&self, document: Document) {
        self.documents.write().await.insert(document.id, document);
    }

    /// Remove a document, returning it if present
    pub async fn remove(&self, id: DocumentId) -> Option<Document> {
        self.documents.write().await.remove(&id)
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    /// Number of count calls served so far
    pub fn count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }

    /// Number of find calls served so far
    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    /// Take the store on- or offline
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self, operation: &str) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::new(operation, "memory store is offline"))
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn count(&self, filter: &Filter) -> StoreResult<u64> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        self.ensure_available("count")?;

        let documents = self.documents.read().await;
        Ok(documents.values().filter(|d| filter.matches(d)).count() as u64)
    }

    async fn find(&self, query: &FindQuery) -> StoreResult<Vec<Document>> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        self.ensure_available("find")?;

        let documents = self.documents.read().await;
        let mut matched: Vec<Document> = documents
            .values()
            .filter(|d| query.before.map_or(true, |before| d.id < before))
            .filter(|d| query.filter.matches(d))
            .cloned()
            .collect();

        if let Some(sort) = &query.sort {
            matched.sort_by(|a, b| compare_documents(a, b, sort));
        }

        let skip = usize::try_from(query.skip).unwrap_or(usize::MAX);
        let limit = query
            .limit
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));

        Ok(matched.into_iter().skip(skip).take(limit).collect())
    }
}
