use axum::{
    extract::{Query, State},
    http::{HeaderName, HeaderValue},
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use shopwiz_search::CacheStatus;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

pub(super) const MAX_QUERY_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    pub query: Option<String>,
    /// Kept as text: anything non-numeric falls back to page 1.
    pub page: Option<String>,
}

fn cache_header(status: CacheStatus) -> HeaderValue {
    HeaderValue::from_static(match status {
        CacheStatus::Hit => "hit",
        CacheStatus::Miss => "miss",
        CacheStatus::Skipped => "skipped",
    })
}

pub(super) async fn search_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let query = params.query.unwrap_or_default();
    if query.chars().count() > MAX_QUERY_CHARS {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            format!("query must be at most {MAX_QUERY_CHARS} characters"),
        ));
    }

    let outcome = state
        .search
        .search_detailed(&query, params.page.as_deref().unwrap_or_default())
        .await;

    Ok((
        [(HeaderName::from_static("x-cache"), cache_header(outcome.cache))],
        Json(ApiResponse {
            data: outcome.response,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}
