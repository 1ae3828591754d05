//! Search result caching
//!
//! Responses are memoized per full request shape (query, language, page, size). Any index
//! mutation evicts every entry. Each eviction also bumps a generation counter; a result is
//! only stored if no eviction happened since its query started, so a search racing a
//! mutation never re-populates the cache with pre-mutation results.

use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use jts_common::search::{SearchRequest, SearchResponse};
use lru::LruCache;

/// Default number of cached responses
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Cache key: the complete normalized request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub query: String,
    pub language: String,
    pub page: u32,
    pub size: u32,
}

impl From<&SearchRequest> for CacheKey {
    fn from(request: &SearchRequest) -> Self {
        Self {
            query: request.query.clone(),
            language: request.language.clone(),
            page: request.page,
            size: request.size,
        }
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Number of whole-cache evictions
    pub evictions: u64,
    /// Puts dropped because an eviction happened while the query ran
    pub stale_puts: u64,
    /// Entries currently held
    pub entries: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Search result cache
pub trait ResultCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> Option<SearchResponse>;

    /// Store a response computed while the cache was at `generation`
    ///
    /// Dropped if the cache has been evicted since.
    fn put(&self, key: CacheKey, response: SearchResponse, generation: u64);

    /// Drop every entry and advance the generation
    fn evict_all(&self);

    /// Current generation; read before querying the store
    fn generation(&self) -> u64;

    fn stats(&self) -> CacheStats;
}

struct CacheState {
    entries: LruCache<CacheKey, SearchResponse>,
    generation: u64,
    stats: CacheStats,
}

/// Bounded LRU implementation of [`ResultCache`]
pub struct LruResultCache {
    state: Mutex<CacheState>,
}

impl Default for LruResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl LruResultCache {
    /// Create a cache holding at most `capacity` responses (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            state: Mutex::new(CacheState {
                entries: LruCache::new(capacity),
                generation: 0,
                stats: CacheStats::default(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        // Cache contents stay consistent even if a holder panicked
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResultCache for LruResultCache {
    fn get(&self, key: &CacheKey) -> Option<SearchResponse> {
        let mut state = self.lock();
        match state.entries.get(key).cloned() {
            Some(response) => {
                state.stats.hits += 1;
                Some(response)
            }
            None => {
                state.stats.misses += 1;
                None
            }
        }
    }

    fn put(&self, key: CacheKey, response: SearchResponse, generation: u64) {
        let mut state = self.lock();
        if state.generation != generation {
            state.stats.stale_puts += 1;
            tracing::debug!(query = %key.query, "Discarding result computed before eviction");
            return;
        }
        state.entries.put(key, response);
    }

    fn evict_all(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.generation += 1;
        state.stats.evictions += 1;
    }

    fn generation(&self) -> u64 {
        self.lock().generation
    }

    fn stats(&self) -> CacheStats {
        let state = self.lock();
        CacheStats {
            entries: state.entries.len(),
            ..state.stats.clone()
        }
    }
}
