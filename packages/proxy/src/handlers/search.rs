//! Search handlers: `GET /api/search` and `GET /api/search/all`.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::IgnoredAny;
use sneaker_proxy_api::{SearchAllQuery, SearchQuery};

use super::AppState;
use crate::{
    aggregate::{aggregate_all, Aggregation},
    error::AppError,
    upstream::PageRequest,
};

/// `GET /api/search`: one upstream page, relayed.
///
/// The upstream status is returned as-is, error statuses included. The body
/// must be JSON; it is checked and then passed through byte for byte.
/// Repeated query keys take their first value.
pub async fn search(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let q = SearchQuery::from_pairs(&pairs);
    let req = PageRequest::new(q.effective_query(), q.effective_page(), q.effective_limit());
    let resp = state.upstream.fetch(&req).await?;
    resp.json::<IgnoredAny>()?;

    Ok((
        resp.status,
        [(header::CONTENT_TYPE, "application/json")],
        resp.body,
    )
        .into_response())
}

/// `GET /api/search/all`: every upstream page, combined.
///
/// Returns 200 with an [`AggregatedResponse`](sneaker_proxy_api::AggregatedResponse),
/// or page 1's status with `Failed to fetch data` when page 1 is refused.
pub async fn search_all(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let q = SearchAllQuery::from_pairs(&pairs);
    match aggregate_all(state.upstream.as_ref(), q.effective_query()).await? {
        Aggregation::Complete(agg) => {
            tracing::info!(
                query = %agg.shoe_name,
                total_items = agg.total_items,
                "aggregated search"
            );
            Ok(Json(agg).into_response())
        }
        Aggregation::FirstPageFailed(status) => Err(AppError::UpstreamNonSuccess(status)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
