//! Page fetcher: curl multi backend.
//!
//! One `FetchClient` wraps a single `curl::multi` handle, so every request in
//! a run shares its connection cache. Requests are driven on the calling
//! thread by one event loop; call from `spawn_blocking` when used from async
//! code. Each URL gets exactly one GET and exactly one `FetchOutcome`; there
//! is no retry.

mod classify;
mod handler;
mod outcome;
mod refill;
mod run;

use std::time::Duration;

use crate::config::RawfetchConfig;

pub use classify::classify_curl_error;
pub use outcome::SUCCESS_STATUS;

/// Per-request curl settings shared by every handle in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub follow_redirects: bool,
    pub max_redirects: u32,
    pub user_agent: Option<String>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::from(&RawfetchConfig::default())
    }
}

impl From<&RawfetchConfig> for FetchOptions {
    fn from(cfg: &RawfetchConfig) -> Self {
        Self {
            request_timeout: cfg.request_timeout(),
            connect_timeout: cfg.connect_timeout(),
            follow_redirects: cfg.follow_redirects,
            max_redirects: cfg.max_redirects,
            user_agent: cfg.user_agent.clone(),
        }
    }
}

/// Shared HTTP client for one run. Dropping it closes pooled connections.
pub struct FetchClient {
    multi: curl::multi::Multi,
    options: FetchOptions,
}

impl FetchClient {
    pub fn new(options: FetchOptions) -> Self {
        Self {
            multi: curl::multi::Multi::new(),
            options,
        }
    }
}

/// Why a request produced no response to classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Request deadline or connect timeout expired.
    Timeout,
    /// DNS, refused connection, reset, empty reply.
    Connection,
    Tls,
    /// 200 response whose body could not be read as text.
    Decode,
    Other,
}

/// Transport-level failure for one request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{detail}")]
pub struct TransportError {
    pub kind: TransportKind,
    pub detail: String,
}

/// Result of fetching one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Status 200; body decoded as text.
    Success { url: String, body: String, status: u16 },
    /// Any final status other than 200. The body is discarded.
    HttpFailure { url: String, status: u16 },
    TransportFailure { url: String, error: TransportError },
}

impl FetchOutcome {
    pub fn url(&self) -> &str {
        match self {
            FetchOutcome::Success { url, .. }
            | FetchOutcome::HttpFailure { url, .. }
            | FetchOutcome::TransportFailure { url, .. } => url,
        }
    }
}

/// Fetch a single URL with `client`.
pub fn fetch(client: &FetchClient, url: &str) -> FetchOutcome {
    let urls = [url.to_string()];
    let mut result = None;
    if let Err(e) = run::run_multi(client, &urls, 1, &mut |_, o| result = Some(o)) {
        tracing::warn!(url, error = %e, "fetch loop failed");
    }
    result.unwrap_or_else(|| FetchOutcome::TransportFailure {
        url: url.to_string(),
        error: TransportError {
            kind: TransportKind::Other,
            detail: "request produced no result".to_string(),
        },
    })
}

/// Fetch every URL in `urls` over `client`. When `max_concurrent` is `Some(n)`,
/// at most `n` requests are in flight at once; `None` starts them all.
/// `on_outcome(index, outcome)` runs once per URL as each request finishes.
pub fn fetch_all<F>(
    client: &FetchClient,
    urls: &[String],
    max_concurrent: Option<usize>,
    mut on_outcome: F,
) -> Result<(), curl::MultiError>
where
    F: FnMut(usize, FetchOutcome),
{
    let max = max_concurrent.unwrap_or(urls.len()).max(1);
    run::run_multi(client, urls, max, &mut on_outcome)
}
