//! DuckDuckGo HTML search client.
//!
//! Queries the DuckDuckGo HTML endpoint (no API key required) and parses
//! the result page into normalized hits.
//!
//! ### Specification
//!
//! - **Endpoint**: `https://html.duckduckgo.com/html/`
//! - **Rate limiting**: minimum 1s interval between requests; the endpoint
//!   throttles aggressively and a 429 surfaces as a backend failure.
//! - **Normalization**: redirect-wrapped result links (`uddg` parameter)
//!   are unwrapped to their targets.

pub mod parse;

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use skry_core::{Error, SearchHit, SearchPort};

/// Default endpoint for the DuckDuckGo HTML interface.
const DEFAULT_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "skry/0.1";

/// Minimum interval between requests.
const MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(1);

/// Search client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Endpoint URL (default: https://html.duckduckgo.com/html/).
    pub endpoint: String,
    /// Request timeout (default: 20s).
    pub timeout: Duration,
    /// User-agent string (default: skry/0.x).
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Rate limiter to enforce request intervals.
#[derive(Debug)]
struct RateLimiter {
    last_request: Mutex<Instant>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(Instant::now().checked_sub(min_interval).unwrap_or_else(Instant::now)),
            min_interval,
        }
    }

    /// Acquire permission to make a request, waiting if necessary.
    async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < self.min_interval {
            tokio::time::sleep(self.min_interval - elapsed).await;
        }
        *last = Instant::now();
    }
}

/// DuckDuckGo HTML search client.
#[derive(Debug, Clone)]
pub struct DdgClient {
    http: reqwest::Client,
    config: SearchConfig,
    rate_limiter: Arc<RateLimiter>,
}

impl DdgClient {
    /// Create a new search client with the given configuration.
    pub fn new(config: SearchConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .build()
            .map_err(|e| Error::SearchFailed(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config, rate_limiter: Arc::new(RateLimiter::new(MIN_REQUEST_INTERVAL)) })
    }

    async fn fetch_result_page(&self, query: &str) -> Result<String, Error> {
        self.rate_limiter.acquire().await;

        let response = self
            .http
            .post(&self.config.endpoint)
            .header(header::USER_AGENT, &self.config.user_agent)
            .form(&[("q", query)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::SearchFailed("request timeout".into())
                } else {
                    Error::SearchFailed(format!("network error: {}", e))
                }
            })?;

        let status = response.status();
        tracing::debug!("search response status: {}", status);

        if status == 429 {
            return Err(Error::SearchFailed("rate limited by provider".into()));
        }
        if status.is_client_error() || status.is_server_error() {
            return Err(Error::SearchFailed(format!("HTTP {}", status.as_u16())));
        }

        response
            .text()
            .await
            .map_err(|e| Error::SearchFailed(format!("failed to read response: {}", e)))
    }
}

#[async_trait]
impl SearchPort for DdgClient {
    /// Execute a web search query.
    ///
    /// Handles rate limiting, the provider request, and result
    /// normalization; hits come back in provider order.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, Error> {
        let start = Instant::now();
        tracing::debug!(query, "searching DuckDuckGo");

        let html = self.fetch_result_page(query).await?;
        let mut hits = parse::parse_result_page(&html);
        hits.truncate(max_results);

        tracing::debug!("search completed in {:?}, {} results", start.elapsed(), hits.len());
        Ok(hits)
    }
}
