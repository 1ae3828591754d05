//! Document stores
//!
//! A document store holds catalog entries and answers relevance queries. Two are provided:
//! [`MemoryStore`] (in-process only) and [`SqliteStore`] (persisted, queried through an
//! in-process index hydrated at startup).

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use jts_common::{CatalogEntry, Result};

use crate::search::RelevanceQuery;

/// Page of ranked documents plus the total number of matches
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreHits {
    pub documents: Vec<CatalogEntry>,
    pub total_found: u64,
}

/// Searchable document store
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert or replace documents by id
    async fn upsert(&self, documents: &[CatalogEntry]) -> Result<()>;

    /// Remove every document
    async fn delete_all(&self) -> Result<()>;

    /// Rank matching documents and return the requested page
    async fn query(&self, query: &RelevanceQuery) -> Result<StoreHits>;

    /// Number of stored documents
    async fn count(&self) -> Result<u64>;
}
