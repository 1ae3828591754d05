//! Job title search service
//!
//! Owns the document store, the result cache and the query builder. Searches go through
//! the cache; every mutation (single index, batch index, clear) evicts the whole cache
//! once the store call returns, whether or not it succeeded.

use std::sync::Arc;
use std::time::Instant;

use jts_common::{CatalogEntry, Error, Result, SearchRequest, SearchResponse};
use tracing::{debug, error, info, warn};

use crate::search::{CacheKey, CacheStats, QueryBuilder, ResultCache};
use crate::store::DocumentStore;

/// Search and indexing façade over the document store
pub struct JobTitleService {
    store: Arc<dyn DocumentStore>,
    cache: Arc<dyn ResultCache>,
    query_builder: QueryBuilder,
}

impl JobTitleService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        cache: Arc<dyn ResultCache>,
        query_builder: QueryBuilder,
    ) -> Self {
        Self {
            store,
            cache,
            query_builder,
        }
    }

    /// Execute a search, serving repeated identical requests from the cache
    ///
    /// # Errors
    /// `Search` when the store cannot answer.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let key = CacheKey::from(request);
        if let Some(cached) = self.cache.get(&key) {
            debug!(query = %request.query, language = %request.language, "Search cache hit");
            return Ok(cached);
        }

        debug!(
            query = %request.query,
            language = %request.language,
            page = request.page,
            size = request.size,
            "Executing search"
        );

        let generation = self.cache.generation();
        let query = self.query_builder.build(request);

        let hits = self.store.query(&query).await.map_err(|e| {
            error!("Search failed: {}", e);
            as_search_error(e)
        })?;

        info!(query = %request.query, results = hits.total_found, "Search completed");

        let response =
            SearchResponse::of(hits.documents, hits.total_found, request.page, request.size);
        self.cache.put(key, response.clone(), generation);
        Ok(response)
    }

    /// Index one entry
    ///
    /// # Errors
    /// `Indexing` when the store rejects the entry.
    pub async fn index_job_title(&self, entry: CatalogEntry) -> Result<()> {
        let result = self.store.upsert(std::slice::from_ref(&entry)).await;
        self.cache.evict_all();

        match result {
            Ok(()) => {
                info!(id = entry.id(), noc_code = entry.noc_code(), "Indexed job title");
                Ok(())
            }
            Err(e) => {
                error!(id = entry.id(), "Indexing failed for job title: {}", e);
                Err(as_indexing_error(e))
            }
        }
    }

    /// Index a batch of entries in one store submission
    ///
    /// An empty batch is a no-op (logged as a warning).
    ///
    /// # Errors
    /// `Indexing` when the store rejects the batch.
    pub async fn index_job_titles(&self, entries: &[CatalogEntry]) -> Result<()> {
        if entries.is_empty() {
            warn!("Attempted to index empty collection");
            return Ok(());
        }

        let start = Instant::now();
        let result = self.store.upsert(entries).await;
        self.cache.evict_all();

        match result {
            Ok(()) => {
                let elapsed = start.elapsed();
                let rate = entries.len() as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
                info!(
                    "Batch indexed {} job titles in {}ms ({:.0} docs/sec)",
                    entries.len(),
                    elapsed.as_millis(),
                    rate
                );
                Ok(())
            }
            Err(e) => {
                error!("Batch indexing failed: {}", e);
                Err(as_indexing_error(e))
            }
        }
    }

    /// Remove every indexed entry and every cached result
    ///
    /// # Errors
    /// `Indexing` when the store cannot be cleared.
    pub async fn clear_index(&self) -> Result<()> {
        let result = self.store.delete_all().await;
        self.cache.evict_all();

        match result {
            Ok(()) => {
                info!("Cleared all job titles from index and cache");
                Ok(())
            }
            Err(e) => {
                error!("Failed to clear index: {}", e);
                Err(as_indexing_error(e))
            }
        }
    }

    /// Number of indexed entries
    pub async fn document_count(&self) -> Result<u64> {
        self.store.count().await.map_err(as_search_error)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

fn as_search_error(e: Error) -> Error {
    match e {
        Error::Search(_) => e,
        other => Error::Search(other.to_string()),
    }
}

fn as_indexing_error(e: Error) -> Error {
    match e {
        Error::Indexing(_) => e,
        other => Error::Indexing(other.to_string()),
    }
}
