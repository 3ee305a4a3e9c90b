//! Client for the upstream product-search API.
//!
//! [`Upstream`] is the seam handlers depend on; [`HttpUpstream`] is the real
//! implementation. Each call is exactly one GET with no retries and no
//! client-side timeout. Whatever status the upstream answers with is handed
//! back to the caller untouched.

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use bytes::Bytes;
use reqwest::{header, Client, Url};
use serde::de::DeserializeOwned;

use crate::config::ProxyConfig;

/// Browser user agent the upstream expects.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

// ---------------------------------------------------------------------------
// UpstreamError
// ---------------------------------------------------------------------------

/// Failures talking to, or making sense of, the upstream.
///
/// All of these surface to callers as HTTP 500 with the display string.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Connection, TLS, or body read failure.
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream answered with something that is not the expected JSON.
    #[error("upstream returned malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A page parsed but lacks a field the aggregation reads.
    #[error("upstream response is missing '{0}'")]
    MissingField(&'static str),

    /// Vendor credentials cannot be sent as HTTP header values.
    #[error("invalid value for header {0}")]
    InvalidHeader(&'static str),
}

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

/// One page request, with every parameter already in its wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub query: String,
    pub page: String,
    pub limit: String,
}

impl PageRequest {
    pub fn new(query: impl Into<String>, page: impl Into<String>, limit: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: page.into(),
            limit: limit.into(),
        }
    }

    fn as_params(&self) -> [(&'static str, &str); 3] {
        [
            ("query", self.query.as_str()),
            ("page", self.page.as_str()),
            ("limit", self.limit.as_str()),
        ]
    }
}

/// What the upstream answered: status plus raw body bytes.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl UpstreamResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Shorthand for a 200 with a JSON body.
    pub fn ok_json(value: &serde_json::Value) -> Self {
        Self::new(StatusCode::OK, value.to_string())
    }

    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// Parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, UpstreamError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

// ---------------------------------------------------------------------------
// Upstream trait
// ---------------------------------------------------------------------------

/// A source of search pages.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Fetch a single page. Non-200 statuses are `Ok`; only transport
    /// failures are `Err`.
    async fn fetch(&self, req: &PageRequest) -> Result<UpstreamResponse, UpstreamError>;
}

// ---------------------------------------------------------------------------
// HttpUpstream
// ---------------------------------------------------------------------------

/// [`Upstream`] over HTTP via `reqwest`.
///
/// `reqwest::Client` pools connections and is cheap to clone.
pub struct HttpUpstream {
    client: Client,
    base_url: Url,
    headers: HeaderMap,
}

impl HttpUpstream {
    /// Build a client for the upstream named in `config`.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder().build()?;
        Self::with_client(client, config)
    }

    /// Build against a caller-supplied `reqwest::Client`.
    pub fn with_client(client: Client, config: &ProxyConfig) -> Result<Self, UpstreamError> {
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            headers: vendor_headers(&config.rapidapi_key, &config.rapidapi_host)?,
        })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn fetch(&self, req: &PageRequest) -> Result<UpstreamResponse, UpstreamError> {
        tracing::debug!(query = %req.query, page = %req.page, limit = %req.limit, "upstream fetch");

        let response = self
            .client
            .get(self.base_url.clone())
            .headers(self.headers.clone())
            .query(&req.as_params())
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        Ok(UpstreamResponse { status, body })
    }
}

/// The fixed header set sent with every upstream request.
pub(crate) fn vendor_headers(key: &str, host: &str) -> Result<HeaderMap, UpstreamError> {
    let mut headers = HeaderMap::new();

    let mut key_value =
        HeaderValue::from_str(key).map_err(|_| UpstreamError::InvalidHeader("x-rapidapi-key"))?;
    key_value.set_sensitive(true);
    headers.insert(HeaderName::from_static("x-rapidapi-key"), key_value);

    headers.insert(
        HeaderName::from_static("x-rapidapi-host"),
        HeaderValue::from_str(host).map_err(|_| UpstreamError::InvalidHeader("x-rapidapi-host"))?,
    );
    headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    Ok(headers)
}
