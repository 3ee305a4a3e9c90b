//! HTTP request handlers for all proxy endpoints.
//!
//! Handlers are async functions that receive Axum extractors and return
//! `Result<impl IntoResponse, AppError>`. Token checks happen in
//! [`crate::middleware::auth`] before any `/api` handler runs.

pub mod docs;
pub mod search;

use std::sync::Arc;

use crate::{config::ProxyConfig, upstream::Upstream};

/// Shared application state threaded through all Axum handlers via [`axum::extract::State`].
///
/// Everything in here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    /// Source of search pages. `HttpUpstream` in production.
    pub upstream: Arc<dyn Upstream>,
}

impl AppState {
    pub fn new(config: ProxyConfig, upstream: Arc<dyn Upstream>) -> Self {
        Self {
            config: Arc::new(config),
            upstream,
        }
    }
}
