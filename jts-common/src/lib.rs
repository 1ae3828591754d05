//! # JTS Common Library
//!
//! Shared code for the job title search workspace:
//! - Error taxonomy (data load, indexing, search)
//! - Catalog entry model and skill levels
//! - Search request/response types
//! - Configuration loading

pub mod catalog;
pub mod config;
pub mod error;
pub mod search;

pub use catalog::{CatalogEntry, SkillLevel};
pub use error::{Error, Result};
pub use search::{SearchRequest, SearchResponse};
