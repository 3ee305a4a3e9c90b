//! Proxy configuration, populated from environment variables.

use std::net::SocketAddr;

use reqwest::{header::HeaderValue, Url};

/// Errors raised while reading configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("API_KEYS must contain at least one non-empty token")]
    NoTokens,

    #[error("BASE_URL must be an absolute URL: {0}")]
    InvalidBaseUrl(String),

    #[error("{0} must be usable as an HTTP header value")]
    InvalidHeaderValue(&'static str),

    #[error("SNEAKER_PROXY_BIND must be a valid socket address (e.g. 0.0.0.0:5000): {0}")]
    InvalidBind(String),
}

/// Runtime configuration for the proxy.
///
/// Read once at startup and shared read-only with every handler.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `API_KEYS` | (required) | Comma-separated tokens callers may present |
/// | `RAPIDAPI_KEY` | (required) | Vendor key sent upstream as `x-rapidapi-key` |
/// | `RAPIDAPI_HOST` | (required) | Vendor host sent upstream as `x-rapidapi-host` |
/// | `BASE_URL` | (required) | Upstream search endpoint |
/// | `SNEAKER_PROXY_BIND` | `0.0.0.0:5000` | TCP socket address to listen on |
#[derive(Clone)]
pub struct ProxyConfig {
    /// Tokens accepted by the token gate.
    pub tokens: TokenSet,

    /// Vendor credential. Never leaves the process except towards upstream.
    pub rapidapi_key: String,

    pub rapidapi_host: String,

    /// Upstream search endpoint; `query`, `page` and `limit` are appended.
    pub base_url: Url,

    /// Socket address the server binds to.
    pub bind_addr: SocketAddr,
}

impl std::fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("tokens", &self.tokens)
            .field("rapidapi_key", &"<redacted>")
            .field("rapidapi_host", &self.rapidapi_host)
            .field("base_url", &self.base_url.as_str())
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

impl ProxyConfig {
    /// Default listen address: all interfaces, port 5000.
    pub const DEFAULT_BIND: &'static str = "0.0.0.0:5000";

    /// Populate config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Populate config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));

        let tokens = TokenSet::parse(&required("API_KEYS")?);
        if tokens.is_empty() {
            return Err(ConfigError::NoTokens);
        }

        let raw_url = required("BASE_URL")?;
        let base_url =
            Url::parse(&raw_url).map_err(|e| ConfigError::InvalidBaseUrl(format!("{raw_url}: {e}")))?;

        let raw_bind = lookup("SNEAKER_PROXY_BIND").unwrap_or_else(|| Self::DEFAULT_BIND.into());
        let bind_addr = raw_bind
            .parse()
            .map_err(|e| ConfigError::InvalidBind(format!("{raw_bind}: {e}")))?;

        let header_value = |name: &'static str| {
            let value = required(name)?;
            HeaderValue::from_str(&value).map_err(|_| ConfigError::InvalidHeaderValue(name))?;
            Ok::<_, ConfigError>(value)
        };

        Ok(Self {
            tokens,
            rapidapi_key: header_value("RAPIDAPI_KEY")?,
            rapidapi_host: header_value("RAPIDAPI_HOST")?,
            base_url,
            bind_addr,
        })
    }
}

// ---------------------------------------------------------------------------
// TokenSet
// ---------------------------------------------------------------------------

/// Ordered, immutable allow-list of caller tokens.
///
/// Built from a comma-separated string: entries are trimmed, blanks dropped,
/// and repeats collapsed onto their first occurrence. An empty token can
/// therefore never authorize a request.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TokenSet(Vec<String>);

impl TokenSet {
    pub fn parse(raw: &str) -> Self {
        let mut tokens: Vec<String> = Vec::new();
        for t in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if !tokens.iter().any(|existing| existing == t) {
                tokens.push(t.to_string());
            }
        }
        Self(tokens)
    }

    /// Membership check. Every comparison runs in time independent of where
    /// the candidate first differs.
    pub fn contains(&self, candidate: &str) -> bool {
        self.0
            .iter()
            .fold(false, |found, t| constant_time_eq(t.as_bytes(), candidate.as_bytes()) | found)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for TokenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let joined: Vec<String> = iter.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse(&joined.join(","))
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TokenSet({} tokens)", self.0.len())
    }
}

fn constant_time_eq(expected: &[u8], provided: &[u8]) -> bool {
    let mut diff = u8::from(expected.len() != provided.len());
    for (i, e) in expected.iter().enumerate() {
        let p = provided.get(i).copied().unwrap_or(0xff);
        diff |= e ^ p;
    }
    diff == 0
}
