//! jts-search library interface
//!
//! Catalog loading, indexing, search and the HTTP surface. Exposed as a library for
//! integration testing; the `jts-search` binary wires it to configuration.

pub mod api;
pub mod db;
pub mod error;
pub mod indexer;
pub mod loader;
pub mod search;
pub mod service;
pub mod store;

pub use crate::error::{ApiError, ApiResult};

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use jts_common::config::AppConfig;
use tower_http::trace::TraceLayer;

use crate::search::{LruResultCache, QueryBuilder};
use crate::service::JobTitleService;
use crate::store::{DocumentStore, MemoryStore, SqliteStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<JobTitleService>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(service: Arc<JobTitleService>) -> Self {
        Self {
            service,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::job_title_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Open the configured document store
///
/// SQLite when `storage.database_path` is set, in-memory otherwise.
pub async fn open_store(config: &AppConfig) -> jts_common::Result<Arc<dyn DocumentStore>> {
    match &config.storage.database_path {
        Some(path) => {
            tracing::info!("Database: {}", path.display());
            let pool = db::init_database_pool(path).await?;
            Ok(Arc::new(SqliteStore::open(pool).await?))
        }
        None => {
            tracing::info!("No database configured, documents are held in memory only");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Assemble the search service from configuration and a store
///
/// # Errors
/// `Config` when the search settings are invalid.
pub fn build_service(
    config: &AppConfig,
    store: Arc<dyn DocumentStore>,
) -> jts_common::Result<JobTitleService> {
    let query_builder = QueryBuilder::from_config(&config.search)?;
    let cache = Arc::new(LruResultCache::new(config.cache.capacity));
    Ok(JobTitleService::new(store, cache, query_builder))
}
