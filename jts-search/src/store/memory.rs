//! In-process document store
//!
//! Documents are kept with per-field term frequencies. A document matches when at least
//! `required_terms` distinct query terms occur in its searched fields. Score is
//! `sum(boost * (1 + ln tf))` over every (field, term) occurrence; ties rank by id.

use async_trait::async_trait;
use jts_common::{CatalogEntry, Result};
use rayon::prelude::*;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{DocumentStore, StoreHits};
use crate::search::query::{split_terms, SearchField};
use crate::search::RelevanceQuery;

/// Batches larger than this are indexed on the blocking pool in parallel
pub const PARALLEL_INDEX_THRESHOLD: usize = 1000;

/// Stored document with its term statistics
#[derive(Debug, Clone)]
struct IndexedDocument {
    entry: CatalogEntry,
    term_frequencies: HashMap<SearchField, HashMap<String, u32>>,
}

impl IndexedDocument {
    fn new(entry: CatalogEntry) -> Self {
        let term_frequencies = SearchField::ALL
            .iter()
            .map(|&field| {
                let mut counts: HashMap<String, u32> = HashMap::new();
                let text = entry.field(field.name()).unwrap_or_default();
                for term in split_terms(text) {
                    *counts.entry(term).or_insert(0) += 1;
                }
                (field, counts)
            })
            .collect();

        Self {
            entry,
            term_frequencies,
        }
    }

    fn frequency(&self, field: SearchField, term: &str) -> u32 {
        self.term_frequencies
            .get(&field)
            .and_then(|counts| counts.get(term))
            .copied()
            .unwrap_or(0)
    }

    /// Relevance score, or `None` when fewer than the required terms occur
    fn score(&self, query: &RelevanceQuery) -> Option<f32> {
        let mut matched_terms = 0;
        let mut score = 0.0f32;

        for term in &query.terms {
            let mut found = false;
            for boost in &query.fields {
                let tf = self.frequency(boost.field, term);
                if tf > 0 {
                    found = true;
                    score += boost.boost * (1.0 + (tf as f32).ln());
                }
            }
            if found {
                matched_terms += 1;
            }
        }

        (matched_terms > 0 && matched_terms >= query.required_terms).then_some(score)
    }
}

/// Document store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, IndexedDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn index_documents(documents: &[CatalogEntry]) -> Result<Vec<IndexedDocument>> {
        if documents.len() <= PARALLEL_INDEX_THRESHOLD {
            return Ok(documents.iter().cloned().map(IndexedDocument::new).collect());
        }

        let owned = documents.to_vec();
        tokio::task::spawn_blocking(move || {
            owned
                .into_par_iter()
                .map(IndexedDocument::new)
                .collect::<Vec<_>>()
        })
        .await
        .map_err(|e| jts_common::Error::Internal(format!("Indexing task failed: {}", e)))
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn upsert(&self, documents: &[CatalogEntry]) -> Result<()> {
        let indexed = Self::index_documents(documents).await?;

        let mut store = self.documents.write().await;
        for doc in indexed {
            store.insert(doc.entry.id().to_string(), doc);
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        self.documents.write().await.clear();
        Ok(())
    }

    async fn query(&self, query: &RelevanceQuery) -> Result<StoreHits> {
        let store = self.documents.read().await;

        let mut ranked: Vec<(f32, &IndexedDocument)> = store
            .values()
            .filter_map(|doc| doc.score(query).map(|score| (score, doc)))
            .collect();

        ranked.sort_by(|(score_a, a), (score_b, b)| {
            score_b
                .total_cmp(score_a)
                .then_with(|| a.entry.id().cmp(b.entry.id()))
        });

        let total_found = ranked.len() as u64;
        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let documents = ranked
            .into_iter()
            .skip(offset)
            .take(query.limit as usize)
            .map(|(_, doc)| doc.entry.project(&query.return_fields))
            .collect();

        Ok(StoreHits {
            documents,
            total_found,
        })
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.documents.read().await.len() as u64)
    }
}
