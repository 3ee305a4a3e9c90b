//! Request and response types for the sneaker search proxy.
//!
//! Shared between the proxy server and its conformance tests so both sides
//! agree on the wire format.
//!
//! # Endpoints covered
//!
//! | Method | Path | Type |
//! |--------|------|------|
//! | GET | `/` | static HTML |
//! | GET | `/api/search` | [`SearchQuery`] → upstream body, relayed |
//! | GET | `/api/search/all` | [`SearchAllQuery`] → [`AggregatedResponse`] |
//!
//! Every failure is an [`ErrorResponse`].

pub mod error;
pub mod search;

pub use error::ErrorResponse;
pub use search::{first_value, AggregatedResponse, SearchAllQuery, SearchQuery, UpstreamPage};
