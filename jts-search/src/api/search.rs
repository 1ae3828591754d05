//! Search endpoints
//!
//! GET takes query-string parameters, POST a JSON body of the same shape. POST validates
//! every raw value; GET only requires a query and lets [`SearchRequest::new`] normalize the
//! rest, so an unsupported language searches all fields.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use jts_common::search::{DEFAULT_LANGUAGE, DEFAULT_PAGE_SIZE};
use jts_common::{SearchRequest, SearchResponse};
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::{ApiError, ApiResult, AppState};

/// Raw search parameters as sent by the caller
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub language: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl SearchParams {
    /// Validate every field, then normalize
    pub fn into_request(self) -> ApiResult<SearchRequest> {
        let query = self.query.unwrap_or_default();
        let language = self.language.filter(|l| !l.trim().is_empty());
        let page = self.page.unwrap_or(0);
        let size = self.size.unwrap_or(DEFAULT_PAGE_SIZE as i64);

        SearchRequest::validate(&query, language.as_deref(), page, size)
            .map_err(ApiError::Validation)?;

        Ok(SearchRequest::new(
            query,
            language.as_deref().unwrap_or(DEFAULT_LANGUAGE),
            page,
            size,
        ))
    }

    /// Require a non-blank query and normalize the rest without rejecting it
    pub fn into_normalized_request(self) -> ApiResult<SearchRequest> {
        let query = self.query.unwrap_or_default();
        if query.trim().is_empty() {
            let mut errors = BTreeMap::new();
            errors.insert("query".to_string(), "Query cannot be empty".to_string());
            return Err(ApiError::Validation(errors));
        }

        Ok(SearchRequest::new(
            query,
            self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE),
            self.page.unwrap_or(0),
            self.size.unwrap_or(DEFAULT_PAGE_SIZE as i64),
        ))
    }
}

/// GET /api/v1/jobtitles/search?query=&language=en&page=0&size=10
pub async fn search_get(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Json<SearchResponse>> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let request = params.into_normalized_request()?;
    Ok(Json(state.service.search(&request).await?))
}

/// POST /api/v1/jobtitles/search
pub async fn search_post(
    State(state): State<AppState>,
    payload: Result<Json<SearchParams>, JsonRejection>,
) -> ApiResult<Json<SearchResponse>> {
    let Json(params) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let request = params.into_request()?;
    Ok(Json(state.service.search(&request).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(query: &str, language: Option<&str>, page: Option<i64>, size: Option<i64>) -> SearchParams {
        SearchParams {
            query: Some(query.to_string()),
            language: language.map(String::from),
            page,
            size,
        }
    }

    #[test]
    fn test_defaults_applied() {
        let request = params("cook", None, None, None).into_request().unwrap();
        assert_eq!(request, SearchRequest::new("cook", "en", 0, 10));
    }

    #[test]
    fn test_blank_language_defaults_to_english() {
        let request = params("cook", Some(" "), None, None).into_request().unwrap();
        assert_eq!(request.language, "en");
    }

    #[test]
    fn test_oversized_page_is_clamped() {
        let request = params("cook", Some("fr"), Some(2), Some(1000)).into_request().unwrap();
        assert_eq!(request.size, 100);
        assert_eq!(request.page, 2);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = params("", Some("de"), Some(-1), Some(0)).into_request().unwrap_err();
        match err {
            ApiError::Validation(fields) => {
                assert_eq!(fields.len(), 4);
                assert_eq!(fields["size"], "Size must be positive");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_normalized_request_keeps_raw_values_lenient() {
        let request = params("nurse", Some("de"), Some(-1), Some(0))
            .into_normalized_request()
            .unwrap();
        assert_eq!(request, SearchRequest::new("nurse", "de", 0, 10));
    }

    #[test]
    fn test_normalized_request_requires_query() {
        let err = params(" ", Some("de"), Some(-1), Some(0))
            .into_normalized_request()
            .unwrap_err();
        match err {
            ApiError::Validation(fields) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields["query"], "Query cannot be empty");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_query_rejected() {
        let missing = SearchParams {
            query: None,
            language: None,
            page: None,
            size: None,
        };
        assert!(matches!(missing.into_request(), Err(ApiError::Validation(_))));
    }
}
