//! Health check endpoints

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use crate::search::CacheStats;
use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status ("ok" or "degraded")
    pub status: String,
    /// Module name ("jts-search")
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
    /// Indexed entries, absent when the store cannot be counted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<u64>,
    pub cache: CacheStats,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;

    let documents = match state.service.document_count().await {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!("Health check could not count documents: {}", e);
            None
        }
    };

    Json(HealthResponse {
        status: if documents.is_some() { "ok" } else { "degraded" }.to_string(),
        module: "jts-search".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        documents,
        cache: state.service.cache_stats(),
    })
}

/// GET /api/v1/jobtitles/health
pub async fn service_health() -> &'static str {
    "Job Title Search Service is running"
}
