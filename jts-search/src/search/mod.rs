//! Query construction and result caching in front of the document store

pub mod cache;
pub mod query;

pub use cache::{CacheKey, CacheStats, LruResultCache, ResultCache};
pub use query::{FieldBoost, MinimumMatch, QueryBuilder, RelevanceQuery, SearchField};
