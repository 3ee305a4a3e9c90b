//! Caller token gate.
//!
//! Every `/api` route requires a `token` query parameter naming one of the
//! tokens in [`ProxyConfig::tokens`](crate::config::ProxyConfig). Anything
//! else is answered with 401 before the handler runs. The token is checked
//! only; it is never forwarded upstream.

use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};
use sneaker_proxy_api::first_value;

use crate::{config::TokenSet, error::AppError, handlers::AppState};

/// Pull `token` out of a request's query string.
///
/// When `token` is repeated the first value wins. A query string that
/// cannot be decoded counts as no token.
pub(crate) fn token_from_request(req: &Request) -> Option<String> {
    Query::<Vec<(String, String)>>::try_from_uri(req.uri())
        .ok()
        .and_then(|Query(pairs)| first_value(&pairs, "token"))
}

/// Whether `token` is present and allow-listed.
pub fn is_authorized(tokens: &TokenSet, token: Option<&str>) -> bool {
    token.is_some_and(|t| tokens.contains(t))
}

/// Axum `from_fn_with_state` middleware rejecting callers without a valid
/// token.
pub async fn require_token(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = token_from_request(&req);
    if !is_authorized(&state.config.tokens, token.as_deref()) {
        tracing::debug!(
            path = req.uri().path(),
            token_present = token.is_some(),
            "rejected caller token"
        );
        return Err(AppError::Unauthorized);
    }
    Ok(next.run(req).await)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
