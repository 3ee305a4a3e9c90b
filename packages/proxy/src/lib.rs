//! Public surface for the `sneaker-proxy` crate.
//!
//! Exposes the router builder, config, and upstream types so that external
//! crates (e.g. the conformance test suite) can spin up an in-process proxy
//! without spawning a subprocess.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod upstream;

pub use config::{ProxyConfig, TokenSet};
pub use handlers::AppState;
pub use router::build_router;
pub use upstream::{HttpUpstream, Upstream};
