//! HTTP API handlers for jts-search

pub mod health;
pub mod index;
pub mod search;

use axum::routing::{get, post};
use axum::Router;

use crate::AppState;

/// Job title search and administration routes, under `/api/v1/jobtitles`
pub fn job_title_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/jobtitles/search",
            get(search::search_get).post(search::search_post),
        )
        .route(
            "/api/v1/jobtitles",
            post(index::index_job_title).delete(index::clear_index),
        )
        .route("/api/v1/jobtitles/batch", post(index::index_job_titles))
        .route("/api/v1/jobtitles/health", get(health::service_health))
}

/// Root health route
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health::health_check))
}
