//! Assembles the Axum [`Router`] from all handler modules.

use axum::{middleware::from_fn_with_state, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::{
    handlers::{docs, search, AppState},
    middleware::auth::require_token,
};

/// Build the complete application router with shared state.
pub fn build_router(state: AppState) -> Router {
    // Token-gated API. `route_layer` keeps unmatched paths a plain 404.
    let api = Router::new()
        .route("/api/search", get(search::search))
        .route("/api/search/all", get(search::search_all))
        .route_layer(from_fn_with_state(state.clone(), require_token));

    Router::new()
        .route("/", get(docs::index))
        .merge(api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
