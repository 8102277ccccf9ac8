//! Database integration tests
//!
//! Tests pagination end to end against a DuckDB-backed document store.

use docpage::{
    CacheConfig, Document, DocumentStore, DuckDbStore, Error, Filter, MemoryCache, OffsetRequest,
    Pager, PaginationConfig, SortDirection,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

fn seeded_store(n: u64) -> DuckDbStore {
    let store = DuckDbStore::open_in_memory("articles").unwrap();
    let docs: Vec<Document> = (1..=n)
        .map(|id| {
            let section = if id % 3 == 0 { "sports" } else { "news" };
            Document::new(id, json!({"section": section, "rank": (n - id) % 4}))
        })
        .collect();
    store.insert_many(&docs).unwrap();
    store
}

fn ids(docs: &[Document]) -> Vec<u64> {
    docs.iter().map(|d| d.id.get()).collect()
}

#[tokio::test]
async fn test_cursor_walk_over_duckdb() {
    let store = seeded_store(10);
    let pager = Pager::new(Arc::new(MemoryCache::new()), PaginationConfig::default()).unwrap();

    let first = pager
        .paginate_with_cursor(&store, &Filter::new(), None, 2)
        .await
        .unwrap();
    assert_eq!(ids(&first.results), vec![10, 9]);
    assert_eq!(first.next.as_deref(), Some("9"));
    assert!(first.has_next);

    let second = pager
        .paginate_with_cursor(&store, &Filter::new(), Some("9"), 2)
        .await
        .unwrap();
    assert_eq!(ids(&second.results), vec![8, 7]);
    assert_eq!(second.previous.as_deref(), Some("9"));

    let tail = pager
        .paginate_with_cursor(&store, &Filter::new(), Some("3"), 2)
        .await
        .unwrap();
    assert_eq!(ids(&tail.results), vec![2, 1]);
    assert!(!tail.has_next);
    assert!(tail.next.is_none());

    let past_end = pager
        .paginate_with_cursor(&store, &Filter::new(), Some("1"), 2)
        .await
        .unwrap();
    assert!(past_end.results.is_empty());
    assert!(!past_end.has_next);
}

#[tokio::test]
async fn test_cursor_walk_with_filter() {
    let store = seeded_store(12);
    let pager = Pager::uncached();
    let filter = Filter::new().with("section", "sports");

    let mut seen = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page = pager
            .paginate_with_cursor(&store, &filter, cursor.as_deref(), 3)
            .await
            .unwrap();
        seen.extend(ids(&page.results));
        if !page.has_next {
            break;
        }
        cursor = page.next;
    }

    assert_eq!(seen, vec![12, 9, 6, 3]);
}

#[tokio::test]
async fn test_offset_pages_over_duckdb() {
    let store = seeded_store(5);
    let pager = Pager::new(Arc::new(MemoryCache::new()), PaginationConfig::default()).unwrap();

    let first = pager
        .paginate_with_offset(&store, &Filter::new(), &OffsetRequest::new(1, 2))
        .await
        .unwrap();
    assert_eq!(ids(&first.results), vec![1, 2]);
    assert_eq!(first.total, 5);
    assert_eq!(first.total_pages, 3);
    assert_eq!(
        serde_json::to_value(&first.pagination).unwrap(),
        json!({"next": {"page": 2, "size": 2}})
    );

    let last = pager
        .paginate_with_offset(&store, &Filter::new(), &OffsetRequest::new(3, 2))
        .await
        .unwrap();
    assert_eq!(ids(&last.results), vec![5]);
    assert_eq!(
        serde_json::to_value(&last.pagination).unwrap(),
        json!({"next": {"page": null, "size": 2}, "prev": {"page": 2, "size": 2}})
    );

    let beyond = pager
        .paginate_with_offset(&store, &Filter::new(), &OffsetRequest::new(9, 2))
        .await
        .unwrap();
    assert!(beyond.results.is_empty());
    assert_eq!(beyond.total, 5);
}

#[tokio::test]
async fn test_out_of_range_bounds_are_caller_errors() {
    let store = seeded_store(3);
    let pager = Pager::uncached();

    for request in [OffsetRequest::new(3, 1 << 62), OffsetRequest::new(1, u64::MAX)] {
        let err = pager
            .paginate_with_offset(&store, &Filter::new(), &request)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }), "{err}");
        assert!(err.is_client_error());
    }

    let err = pager
        .paginate_with_cursor(&store, &Filter::new(), None, u64::MAX - 1)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }), "{err}");
}

#[tokio::test]
async fn test_offset_sorted_by_field() {
    let store = seeded_store(6);
    let pager = Pager::uncached();

    // rank = (6 - id) % 4 → ids 1..=6 get ranks 1, 0, 3, 2, 1, 0
    let request = OffsetRequest::new(1, 6).sort_by("rank", SortDirection::Descending);
    let page = pager
        .paginate_with_offset(&store, &Filter::new(), &request)
        .await
        .unwrap();
    assert_eq!(ids(&page.results), vec![3, 4, 5, 1, 6, 2]);
}

#[tokio::test]
async fn test_cached_total_survives_new_rows_until_expiry() {
    let store = seeded_store(4);
    let pager = Pager::new(
        Arc::new(MemoryCache::new()),
        PaginationConfig {
            cache: CacheConfig::default().with_ttl(3600),
            ..PaginationConfig::default()
        },
    )
    .unwrap();
    let request = OffsetRequest::new(1, 10);

    let before = pager
        .paginate_with_offset(&store, &Filter::new(), &request)
        .await
        .unwrap();
    assert_eq!(before.total, 4);

    store.insert(&Document::new(5, json!({"section": "news"}))).unwrap();

    let after = pager
        .paginate_with_offset(&store, &Filter::new(), &request)
        .await
        .unwrap();
    assert_eq!(after.total, 4);
    assert_eq!(after.results.len(), 5);
}

#[tokio::test]
async fn test_file_backed_store_reopens() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("docs.duckdb");

    {
        let store = DuckDbStore::open(&path, "articles").unwrap();
        store
            .insert_many(&[
                Document::new(1, json!({"title": "a"})),
                Document::new(2, json!({"title": "b"})),
            ])
            .unwrap();
    }

    let store = DuckDbStore::open(&path, "articles").unwrap();
    assert_eq!(store.model_name(), "articles");
    let page = Pager::uncached()
        .paginate_with_cursor(&store, &Filter::new(), None, 5)
        .await
        .unwrap();
    assert_eq!(ids(&page.results), vec![2, 1]);
    assert_eq!(page.results[0].body.get("title"), Some(&json!("b")));
}
