//! Integration tests for the search service, batch indexer and cache interplay

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use jts_common::{CatalogEntry, Error, Result, SearchRequest};
use jts_search::indexer::BatchIndexer;
use jts_search::search::{LruResultCache, QueryBuilder, RelevanceQuery};
use jts_search::service::JobTitleService;
use jts_search::store::{DocumentStore, MemoryStore, StoreHits};

/// Store wrapper recording submissions, with switchable failures
#[derive(Default)]
struct RecordingStore {
    inner: MemoryStore,
    queries: AtomicUsize,
    batches: Mutex<Vec<Vec<String>>>,
    /// Upserts containing this id fail
    poison_id: Mutex<Option<String>>,
    fail_queries: Mutex<bool>,
    fail_delete: Mutex<bool>,
}

impl RecordingStore {
    fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentStore for RecordingStore {
    async fn upsert(&self, documents: &[CatalogEntry]) -> Result<()> {
        let ids: Vec<String> = documents.iter().map(|d| d.id().to_string()).collect();
        self.batches.lock().unwrap().push(ids.clone());

        let poison = self.poison_id.lock().unwrap().clone();
        if let Some(poison) = poison {
            if ids.contains(&poison) {
                return Err(Error::Internal("store rejected batch".to_string()));
            }
        }
        self.inner.upsert(documents).await
    }

    async fn delete_all(&self) -> Result<()> {
        if *self.fail_delete.lock().unwrap() {
            return Err(Error::Internal("store unavailable".to_string()));
        }
        self.inner.delete_all().await
    }

    async fn query(&self, query: &RelevanceQuery) -> Result<StoreHits> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if *self.fail_queries.lock().unwrap() {
            return Err(Error::Internal("store unavailable".to_string()));
        }
        self.inner.query(query).await
    }

    async fn count(&self) -> Result<u64> {
        self.inner.count().await
    }
}

fn setup() -> (Arc<RecordingStore>, Arc<JobTitleService>) {
    let store = Arc::new(RecordingStore::default());
    let service = Arc::new(JobTitleService::new(
        store.clone(),
        Arc::new(LruResultCache::new(64)),
        QueryBuilder::default(),
    ));
    (store, service)
}

fn cook(n: usize) -> CatalogEntry {
    CatalogEntry::new(format!("{}", n), "63200")
        .unwrap()
        .with_titles(format!("Cook {}", n), format!("Cuisinier {}", n))
}

#[tokio::test]
async fn test_batches_cover_every_entry_once() {
    let (store, service) = setup();
    let entries: Vec<CatalogEntry> = (1..=1203).map(cook).collect();

    let report = BatchIndexer::new(service.clone(), 500).index_all(&entries).await;

    let batches = store.batches();
    assert_eq!(batches.len(), 3);
    assert_eq!(
        batches.iter().map(Vec::len).collect::<Vec<_>>(),
        vec![500, 500, 203]
    );
    let flattened: Vec<String> = batches.into_iter().flatten().collect();
    let expected: Vec<String> = entries.iter().map(|e| e.id().to_string()).collect();
    assert_eq!(flattened, expected);

    assert_eq!(report.batches_attempted, 3);
    assert_eq!(report.batches_failed, 0);
    assert_eq!(report.entries_indexed, 1203);
    assert_eq!(service.document_count().await.unwrap(), 1203);
}

#[tokio::test]
async fn test_failed_batch_is_skipped() {
    let (store, service) = setup();
    *store.poison_id.lock().unwrap() = Some("7".to_string());
    let entries: Vec<CatalogEntry> = (1..=12).map(cook).collect();

    let report = BatchIndexer::new(service.clone(), 5).index_all(&entries).await;

    // Batches: 1-5, 6-10 (fails), 11-12
    assert_eq!(store.batches().len(), 3);
    assert_eq!(report.batches_attempted, 3);
    assert_eq!(report.batches_failed, 1);
    assert_eq!(report.entries_indexed, 7);
    assert_eq!(service.document_count().await.unwrap(), 7);
}

#[tokio::test]
async fn test_exact_multiple_of_batch_size() {
    let (store, service) = setup();
    let entries: Vec<CatalogEntry> = (1..=1000).map(cook).collect();

    BatchIndexer::new(service, 500).index_all(&entries).await;
    assert_eq!(store.batches().len(), 2);
}

#[tokio::test]
async fn test_zero_batch_size_uses_default() {
    let (store, service) = setup();
    let entries: Vec<CatalogEntry> = (1..=1203).map(cook).collect();

    BatchIndexer::new(service, 0).index_all(&entries).await;
    assert_eq!(
        store.batches().iter().map(Vec::len).collect::<Vec<_>>(),
        vec![500, 500, 203]
    );
}

#[tokio::test]
async fn test_no_entries_submits_nothing() {
    let (store, service) = setup();
    let report = BatchIndexer::new(service, 500).index_all(&[]).await;

    assert!(store.batches().is_empty());
    assert_eq!(report.batches_attempted, 0);
}

#[tokio::test]
async fn test_identical_requests_hit_store_once() {
    let (store, service) = setup();
    service.index_job_titles(&[cook(1), cook(2)]).await.unwrap();
    let request = SearchRequest::new("cook", "en", 0, 10);

    let first = service.search(&request).await.unwrap();
    let second = service.search(&request).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.total_count, 2);
    assert_eq!(store.query_count(), 1);
}

#[tokio::test]
async fn test_mutation_between_requests_forces_round_trip() {
    let (store, service) = setup();
    service.index_job_title(cook(1)).await.unwrap();
    let request = SearchRequest::new("cook", "en", 0, 10);

    service.search(&request).await.unwrap();
    service.index_job_title(cook(2)).await.unwrap();
    let after = service.search(&request).await.unwrap();

    assert_eq!(store.query_count(), 2);
    assert_eq!(after.total_count, 2);
}

#[tokio::test]
async fn test_failed_mutation_still_evicts() {
    let (store, service) = setup();
    service.index_job_title(cook(1)).await.unwrap();
    let request = SearchRequest::new("cook", "en", 0, 10);
    service.search(&request).await.unwrap();

    *store.poison_id.lock().unwrap() = Some("2".to_string());
    let result = service.index_job_title(cook(2)).await;
    assert!(matches!(result, Err(Error::Indexing(_))));

    service.search(&request).await.unwrap();
    assert_eq!(store.query_count(), 2);

    *store.fail_delete.lock().unwrap() = true;
    let result = service.clear_index().await;
    assert!(matches!(result, Err(Error::Indexing(_))));

    service.search(&request).await.unwrap();
    assert_eq!(store.query_count(), 3);
}

#[tokio::test]
async fn test_store_failure_is_search_error_and_not_cached() {
    let (store, service) = setup();
    let request = SearchRequest::new("cook", "en", 0, 10);

    *store.fail_queries.lock().unwrap() = true;
    let result = service.search(&request).await;
    assert!(matches!(result, Err(Error::Search(_))));

    *store.fail_queries.lock().unwrap() = false;
    let response = service.search(&request).await.unwrap();
    assert_eq!(response.total_count, 0);
    assert_eq!(store.query_count(), 2);
}

#[tokio::test]
async fn test_pagination_metadata() {
    let (_store, service) = setup();
    let entries: Vec<CatalogEntry> = (1..=25).map(cook).collect();
    service.index_job_titles(&entries).await.unwrap();

    let response = service
        .search(&SearchRequest::new("cook", "en", 2, 10))
        .await
        .unwrap();

    assert_eq!(response.total_count, 25);
    assert_eq!(response.total_pages, 3);
    assert_eq!(response.page, 2);
    assert_eq!(response.page_size, 10);
    assert_eq!(response.results.len(), 5);
}
