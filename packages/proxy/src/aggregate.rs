//! Walks every page of a search and concatenates the results.
//!
//! Pages are fetched strictly one after another. Page 1 decides everything:
//! a non-200 there aborts, otherwise its `totalPages` bounds the walk and its
//! `count` is reported as-is. A later page that answers non-200 is skipped
//! and the aggregate is silently partial; a later page that answers 200 with
//! a broken body fails the whole request.

use axum::http::StatusCode;
use serde_json::Value;
use sneaker_proxy_api::{AggregatedResponse, UpstreamPage};
use tracing::{debug, warn};

use crate::upstream::{PageRequest, Upstream, UpstreamError};

/// Page size requested for every page of an aggregation.
pub const AGGREGATE_PAGE_LIMIT: &str = "100";

/// Result of walking a search.
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregation {
    /// Page 1 succeeded; later pages were appended where they succeeded.
    Complete(AggregatedResponse),
    /// Page 1 answered with this non-200 status. Nothing else was fetched.
    FirstPageFailed(StatusCode),
}

/// Fetch every page for `query` and combine them.
pub async fn aggregate_all(
    upstream: &dyn Upstream,
    query: &str,
) -> Result<Aggregation, UpstreamError> {
    let first = upstream
        .fetch(&PageRequest::new(query, "1", AGGREGATE_PAGE_LIMIT))
        .await?;
    if !first.is_ok() {
        return Ok(Aggregation::FirstPageFailed(first.status));
    }

    let first: UpstreamPage = first.json()?;
    let mut results: Vec<Value> = first
        .results
        .ok_or(UpstreamError::MissingField("results"))?;
    let total_pages = first
        .total_pages
        .ok_or(UpstreamError::MissingField("totalPages"))?;
    let count = first.count.ok_or(UpstreamError::MissingField("count"))?;

    debug!(query, total_pages, "aggregating search");

    for page in 2..=total_pages {
        let resp = upstream
            .fetch(&PageRequest::new(query, page.to_string(), AGGREGATE_PAGE_LIMIT))
            .await?;
        if !resp.is_ok() {
            warn!(query, page, status = %resp.status, "skipping page that failed upstream");
            continue;
        }
        let page_data: UpstreamPage = resp.json()?;
        results.extend(
            page_data
                .results
                .ok_or(UpstreamError::MissingField("results"))?,
        );
    }

    Ok(Aggregation::Complete(AggregatedResponse::new(
        query, count, results,
    )))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::upstream::UpstreamResponse;

    /// An [`Upstream`] that answers from a fixed page table and records
    /// every request it sees.
    #[derive(Default)]
    pub(crate) struct ScriptedUpstream {
        pages: HashMap<String, UpstreamResponse>,
        unreachable: HashSet<String>,
        pub(crate) seen: Mutex<Vec<PageRequest>>,
    }

    impl ScriptedUpstream {
        pub(crate) fn with_page(mut self, page: u32, resp: UpstreamResponse) -> Self {
            self.pages.insert(page.to_string(), resp);
            self
        }

        /// Fetching `page` fails at the transport level.
        pub(crate) fn with_transport_failure(mut self, page: u32) -> Self {
            self.unreachable.insert(page.to_string());
            self
        }

        pub(crate) fn pages_fetched(&self) -> Vec<String> {
            self.seen
                .lock()
                .unwrap()
                .iter()
                .map(|r| r.page.clone())
                .collect()
        }
    }

    #[async_trait]
    impl Upstream for ScriptedUpstream {
        async fn fetch(&self, req: &PageRequest) -> Result<UpstreamResponse, UpstreamError> {
            self.seen.lock().unwrap().push(req.clone());
            if self.unreachable.contains(&req.page) {
                return Err(transport_error());
            }
            Ok(self
                .pages
                .get(&req.page)
                .cloned()
                .unwrap_or_else(|| UpstreamResponse::new(StatusCode::NOT_FOUND, "{}")))
        }
    }

    /// A real `reqwest::Error`, produced without touching the network.
    pub(crate) fn transport_error() -> UpstreamError {
        let err = reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();
        UpstreamError::Transport(err)
    }

    /// `n` items tagged with their page so ordering is checkable.
    pub(crate) fn items(page: u32, n: usize) -> Vec<Value> {
        (0..n).map(|i| json!({ "page": page, "idx": i })).collect()
    }

    pub(crate) fn page(page: u32, n: usize, count: u64, total_pages: i64) -> UpstreamResponse {
        UpstreamResponse::ok_json(&json!({
            "results": items(page, n),
            "count": count,
            "totalPages": total_pages,
        }))
    }

    fn complete(a: Aggregation) -> AggregatedResponse {
        match a {
            Aggregation::Complete(r) => r,
            other => panic!("expected a complete aggregation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn three_pages_concatenate_in_order() {
        let up = ScriptedUpstream::default()
            .with_page(1, page(1, 10, 25, 3))
            .with_page(2, page(2, 10, 25, 3))
            .with_page(3, page(3, 5, 25, 3));

        let agg = complete(aggregate_all(&up, "nike").await.unwrap());

        assert_eq!(agg.shoe_name, "nike");
        assert_eq!(agg.total_items, 25);
        assert_eq!(agg.results.len(), 25);
        assert_eq!(agg.count, json!(25));
        let pages: Vec<u64> = agg.results.iter().map(|v| v["page"].as_u64().unwrap()).collect();
        assert!(pages.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(pages.first(), Some(&1));
        assert_eq!(pages.last(), Some(&3));
        assert_eq!(up.pages_fetched(), vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn every_page_uses_query_and_fixed_limit() {
        let up = ScriptedUpstream::default()
            .with_page(1, page(1, 1, 2, 2))
            .with_page(2, page(2, 1, 2, 2));

        aggregate_all(&up, "yeezy 350").await.unwrap();

        let seen = up.seen.lock().unwrap();
        assert!(seen.iter().all(|r| r.query == "yeezy 350" && r.limit == "100"));
    }

    #[tokio::test]
    async fn single_page_fetches_once() {
        let up = ScriptedUpstream::default().with_page(1, page(1, 7, 7, 1));

        let agg = complete(aggregate_all(&up, "dunk").await.unwrap());

        assert_eq!(agg.total_items, 7);
        assert_eq!(agg.results, items(1, 7));
        assert_eq!(up.pages_fetched(), vec!["1"]);
    }

    #[tokio::test]
    async fn zero_total_pages_keeps_page_one() {
        let up = ScriptedUpstream::default().with_page(1, page(1, 0, 0, 0));

        let agg = complete(aggregate_all(&up, "nothing").await.unwrap());

        assert_eq!(agg.total_items, 0);
        assert_eq!(up.pages_fetched(), vec!["1"]);
    }

    #[tokio::test]
    async fn failed_middle_page_is_skipped() {
        let up = ScriptedUpstream::default()
            .with_page(1, page(1, 10, 30, 3))
            .with_page(2, UpstreamResponse::new(StatusCode::BAD_GATEWAY, "{}"))
            .with_page(3, page(3, 10, 30, 3));

        let agg = complete(aggregate_all(&up, "nike").await.unwrap());

        assert_eq!(agg.total_items, 20);
        assert!(agg.results.iter().all(|v| v["page"] != 2));
        // count is page 1's figure even though a page went missing
        assert_eq!(agg.count, json!(30));
        assert_eq!(up.pages_fetched(), vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn failed_first_page_stops_immediately() {
        let up = ScriptedUpstream::default()
            .with_page(1, UpstreamResponse::new(StatusCode::TOO_MANY_REQUESTS, "{}"))
            .with_page(2, page(2, 10, 20, 2));

        let res = aggregate_all(&up, "nike").await.unwrap();

        assert_eq!(res, Aggregation::FirstPageFailed(StatusCode::TOO_MANY_REQUESTS));
        assert_eq!(up.pages_fetched(), vec!["1"]);
    }

    #[tokio::test]
    async fn missing_total_pages_is_an_error() {
        let up = ScriptedUpstream::default().with_page(
            1,
            UpstreamResponse::ok_json(&json!({ "results": [], "count": 0 })),
        );

        let err = aggregate_all(&up, "nike").await.unwrap_err();
        assert!(matches!(err, UpstreamError::MissingField("totalPages")));
    }

    #[tokio::test]
    async fn transport_failure_on_later_page_fails_the_request() {
        let up = ScriptedUpstream::default()
            .with_page(1, page(1, 10, 30, 3))
            .with_transport_failure(2)
            .with_page(3, page(3, 10, 30, 3));

        let err = aggregate_all(&up, "nike").await.unwrap_err();

        assert!(matches!(err, UpstreamError::Transport(_)));
        assert_eq!(up.pages_fetched(), vec!["1", "2"]);
    }

    #[tokio::test]
    async fn malformed_later_page_fails_the_request() {
        let up = ScriptedUpstream::default()
            .with_page(1, page(1, 10, 20, 2))
            .with_page(2, UpstreamResponse::new(StatusCode::OK, "not json"));

        let err = aggregate_all(&up, "nike").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Parse(_)));
    }
}
