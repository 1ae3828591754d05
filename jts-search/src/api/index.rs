//! Index administration endpoints

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use jts_common::CatalogEntry;

use crate::{ApiError, ApiResult, AppState};

/// POST /api/v1/jobtitles
///
/// Indexes one entry. Entries failing id/code validation are rejected with 400.
pub async fn index_job_title(
    State(state): State<AppState>,
    payload: Result<Json<CatalogEntry>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(entry) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    state.service.index_job_title(entry).await?;
    Ok(StatusCode::CREATED)
}

/// POST /api/v1/jobtitles/batch
pub async fn index_job_titles(
    State(state): State<AppState>,
    payload: Result<Json<Vec<CatalogEntry>>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(entries) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    state.service.index_job_titles(&entries).await?;
    Ok(StatusCode::CREATED)
}

/// DELETE /api/v1/jobtitles
pub async fn clear_index(State(state): State<AppState>) -> ApiResult<StatusCode> {
    state.service.clear_index().await?;
    Ok(StatusCode::NO_CONTENT)
}
