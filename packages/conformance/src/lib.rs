//! Shared helpers for the sneaker proxy conformance test suite.
//!
//! Provides [`spawn_upstream`], a scripted stand-in for the vendor search API
//! that records every request it receives, and [`spawn_proxy`], which binds a
//! real proxy in front of it. Both listen on OS-assigned ports on
//! `127.0.0.1` and run in background `tokio` tasks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use sneaker_proxy::{build_router, AppState, HttpUpstream, ProxyConfig, TokenSet};

/// Token accepted by proxies started with [`spawn_proxy`].
pub const TEST_TOKEN: &str = "conformance-token";
/// Vendor key the proxy is configured with.
pub const VENDOR_KEY: &str = "conformance-vendor-key";
/// Vendor host the proxy is configured with.
pub const VENDOR_HOST: &str = "sneakers.conformance.test";

// ---------------------------------------------------------------------------
// Mock upstream
// ---------------------------------------------------------------------------

/// One request as seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub params: HashMap<String, String>,
    pub headers: HeaderMap,
}

impl RecordedRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Canned answers keyed by the `page` query parameter.
///
/// Pages with no entry answer 404 `{}`.
#[derive(Debug, Clone, Default)]
pub struct UpstreamScript {
    pages: HashMap<String, (StatusCode, String)>,
}

impl UpstreamScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// A 200 page of `n` items, each tagged with its page number.
    pub fn page(self, page: u32, n: usize, count: u64, total_pages: u32) -> Self {
        let body = json!({
            "results": items(page, n),
            "count": count,
            "totalPages": total_pages,
        });
        self.raw(page, StatusCode::OK, body.to_string())
    }

    /// An arbitrary status and JSON body for `page`.
    pub fn status(self, page: u32, status: StatusCode, body: Value) -> Self {
        self.raw(page, status, body.to_string())
    }

    /// An arbitrary status and raw body for `page`.
    pub fn raw(mut self, page: u32, status: StatusCode, body: impl Into<String>) -> Self {
        self.pages.insert(page.to_string(), (status, body.into()));
        self
    }
}

/// `n` items for `page`: `{"page": page, "idx": 0..n}`.
pub fn items(page: u32, n: usize) -> Vec<Value> {
    (0..n).map(|i| json!({ "page": page, "idx": i })).collect()
}

/// Handle on a running mock upstream.
#[derive(Clone)]
pub struct MockUpstream {
    pub url: String,
    log: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockUpstream {
    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.log.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// The `page` parameter of every request received so far.
    pub fn pages_requested(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| r.param("page").unwrap_or_default().to_string())
            .collect()
    }
}

#[derive(Clone)]
struct MockState {
    script: Arc<UpstreamScript>,
    log: Arc<Mutex<Vec<RecordedRequest>>>,
}

async fn mock_search(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let page = params.get("page").cloned().unwrap_or_default();
    state
        .log
        .lock()
        .unwrap_or_else(|p| p.into_inner())
        .push(RecordedRequest { params, headers });

    match state.script.pages.get(&page) {
        Some((status, body)) => (
            *status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.clone(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

/// Start a mock upstream answering `GET /search` from `script`.
///
/// # Panics
///
/// Panics if the TCP listener cannot be bound.
pub async fn spawn_upstream(script: UpstreamScript) -> MockUpstream {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");

    let log = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        script: Arc::new(script),
        log: Arc::clone(&log),
    };
    let router = Router::new()
        .route("/search", get(mock_search))
        .with_state(state);

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("mock upstream error");
    });

    MockUpstream {
        url: format!("http://{addr}/search"),
        log,
    }
}

// ---------------------------------------------------------------------------
// Proxy
// ---------------------------------------------------------------------------

/// Start an in-process proxy pointed at `upstream_url` and return its base
/// URL, e.g. `http://127.0.0.1:51234`.
///
/// The proxy accepts exactly [`TEST_TOKEN`].
///
/// # Panics
///
/// Panics if the TCP listener cannot be bound or the upstream URL is invalid.
pub async fn spawn_proxy(upstream_url: &str) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");

    let config = ProxyConfig {
        tokens: TokenSet::parse(TEST_TOKEN),
        rapidapi_key: VENDOR_KEY.into(),
        rapidapi_host: VENDOR_HOST.into(),
        base_url: upstream_url.parse().expect("valid upstream url"),
        bind_addr: addr,
    };
    let upstream = HttpUpstream::from_config(&config).expect("build upstream client");
    let router = build_router(AppState::new(config, Arc::new(upstream)));

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("conformance proxy error");
    });

    format!("http://{addr}")
}

/// Spawn a mock upstream from `script` and a proxy in front of it.
pub async fn spawn_pair(script: UpstreamScript) -> (String, MockUpstream) {
    let upstream = spawn_upstream(script).await;
    let proxy = spawn_proxy(&upstream.url).await;
    (proxy, upstream)
}
