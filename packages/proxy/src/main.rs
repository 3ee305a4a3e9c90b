//! `sneaker-proxy`: authenticated proxy in front of the sneaker search API.
//!
//! # Quick start
//!
//! ```sh
//! API_KEYS=token-1,token-2 \
//! RAPIDAPI_KEY=... \
//! RAPIDAPI_HOST=sneaker-database.p.rapidapi.com \
//! BASE_URL=https://sneaker-database.p.rapidapi.com/search \
//! sneaker-proxy
//! ```
//!
//! # Environment variables
//!
//! See [`sneaker_proxy::ProxyConfig`] for the full list.

use std::sync::Arc;

use sneaker_proxy::{build_router, AppState, HttpUpstream, ProxyConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sneaker_proxy=info,tower_http=debug".into()),
        )
        .init();

    let config = match ProxyConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    let upstream = match HttpUpstream::from_config(&config) {
        Ok(upstream) => upstream,
        Err(e) => {
            tracing::error!("failed to build upstream client: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        tokens = config.tokens.len(),
        upstream = %config.base_url,
        "proxy configured"
    );

    let bind_addr = config.bind_addr;
    let app = build_router(AppState::new(config, Arc::new(upstream)));

    tracing::info!("listening on {bind_addr}");
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {bind_addr}: {e}"));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap_or_else(|e| panic!("server error: {e}"));

    tracing::info!("shut down");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to install Ctrl+C handler: {e}");
        std::future::pending::<()>().await;
    }
}
