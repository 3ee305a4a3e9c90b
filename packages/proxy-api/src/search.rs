//! Search request, upstream page, and aggregated response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// First value given for `key` in a decoded query string.
///
/// Later repeats of the same key are ignored.
pub fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

/// Query parameters for `GET /api/search`.
///
/// Every field is optional on the wire. `page` and `limit` are kept as the
/// caller sent them and forwarded upstream verbatim; the upstream decides
/// what a bad value means.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
}

impl SearchQuery {
    /// Build from decoded query pairs, keeping the first value of each key.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            token: first_value(pairs, "token"),
            query: first_value(pairs, "query"),
            page: first_value(pairs, "page"),
            limit: first_value(pairs, "limit"),
        }
    }

    /// Search term, `""` when absent.
    pub fn effective_query(&self) -> &str {
        self.query.as_deref().unwrap_or("")
    }

    /// Page number, `"1"` when absent.
    pub fn effective_page(&self) -> &str {
        self.page.as_deref().unwrap_or("1")
    }

    /// Page size, `"100"` when absent.
    pub fn effective_limit(&self) -> &str {
        self.limit.as_deref().unwrap_or("100")
    }
}

/// Query parameters for `GET /api/search/all`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchAllQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl SearchAllQuery {
    /// Build from decoded query pairs, keeping the first value of each key.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            token: first_value(pairs, "token"),
            query: first_value(pairs, "query"),
        }
    }

    pub fn effective_query(&self) -> &str {
        self.query.as_deref().unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Upstream
// ---------------------------------------------------------------------------

/// The parts of an upstream search page the aggregation reads.
///
/// The upstream owns this shape; unknown fields are ignored and the listed
/// ones are optional here so each caller can decide which absences are
/// fatal. Items are kept as opaque JSON.
///
/// ```json
/// { "results": [ { ... } ], "count": 245, "totalPages": 3 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpstreamPage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<Value>,
    #[serde(
        rename = "totalPages",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub total_pages: Option<i64>,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Response body for a successful `GET /api/search/all`.
///
/// `count` is page 1's `count` relayed verbatim, so it can disagree with
/// `total_items` when pages were skipped or the upstream miscounts.
///
/// ```json
/// {
///   "shoe_name": "nike",
///   "count": 245,
///   "total_items": 245,
///   "results": [ { ... } ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResponse {
    pub shoe_name: String,
    pub count: Value,
    pub total_items: usize,
    pub results: Vec<Value>,
}

impl AggregatedResponse {
    /// Build the response from the collected items; `total_items` always
    /// matches `results.len()`.
    pub fn new(shoe_name: impl Into<String>, count: Value, results: Vec<Value>) -> Self {
        Self {
            shoe_name: shoe_name.into(),
            count,
            total_items: results.len(),
            results,
        }
    }
}
