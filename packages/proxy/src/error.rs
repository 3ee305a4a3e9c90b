//! Application-level error type returned by handlers.
//!
//! All variants serialise to the [`ErrorResponse`] JSON format and map to the
//! appropriate HTTP status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sneaker_proxy_api::{error::messages, ErrorResponse};

use crate::upstream::UpstreamError;

/// An error that a handler can return; converts directly to an HTTP response.
#[derive(Debug)]
pub enum AppError {
    /// Caller token absent or not allow-listed.
    Unauthorized,
    /// Upstream refused the first page of an aggregation with this status.
    UpstreamNonSuccess(StatusCode),
    /// Transport or parse failure; the message goes back to the caller.
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, messages::INVALID_TOKEN.to_string()),
            AppError::UpstreamNonSuccess(status) => (status, messages::FETCH_FAILED.to_string()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

impl From<UpstreamError> for AppError {
    fn from(e: UpstreamError) -> Self {
        tracing::error!(error = %e, "upstream failure");
        AppError::Internal(e.to_string())
    }
}
