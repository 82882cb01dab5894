//! crawl_urls tool implementation.
//!
//! Crawls a batch of URLs and returns their content as markdown, one
//! entry per requested URL. A batch whose crawl completes is cached even
//! when some URLs failed, so known-bad pages are not hammered within the
//! TTL window; whole-batch failures are reported and never cached.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use rmcp::model::{CallToolResult, Content};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use skry_client::fetch::normalize;
use skry_core::{Error, PageMap, PageOutcome, crawl_key};

use crate::state::{AppState, ToolValue};
use crate::tools::error_result;

/// Input parameters for crawl_urls tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CrawlUrlsParams {
    /// URLs to crawl (required, non-empty, absolute http/https).
    pub urls: Vec<String>,
}

/// Implementation of the crawl_urls tool.
pub async fn crawl_urls_impl(state: &AppState, params: CrawlUrlsParams) -> CallToolResult {
    match run(state, params).await {
        Ok(pages) => {
            let rendered: BTreeMap<String, String> = pages
                .iter()
                .map(|(url, outcome)| (url.clone(), render_outcome(outcome)))
                .collect();
            CallToolResult::success(vec![Content::text(
                serde_json::to_string_pretty(&rendered).unwrap_or_default(),
            )])
        }
        Err(e) => {
            if e.is_validation() {
                tracing::warn!(error = %e, "rejected crawl_urls input");
            } else {
                tracing::error!(error = %e, "url crawling failed");
            }
            error_result(&e)
        }
    }
}

/// Flatten an outcome to the historical markdown-or-error-text shape.
fn render_outcome(outcome: &PageOutcome) -> String {
    match outcome {
        PageOutcome::Content(markdown) => markdown.clone(),
        PageOutcome::Failed(reason) => format!("Error: Failed to crawl this page - {}", reason),
    }
}

async fn run(state: &AppState, params: CrawlUrlsParams) -> Result<PageMap, Error> {
    if params.urls.is_empty() {
        return Err(Error::InvalidInput("No valid URLs provided".into()));
    }

    // Validate every URL up front and dedupe preserving first-seen order.
    let mut urls = Vec::new();
    let mut seen = HashSet::new();
    for raw in &params.urls {
        let url = raw.trim().to_string();
        normalize(&url).map_err(|e| Error::InvalidUrl(format!("{}: {}", raw, e)))?;
        if seen.insert(url.clone()) {
            urls.push(url);
        }
    }

    tracing::info!(count = urls.len(), "crawling URLs");

    let key = crawl_key(&urls);
    let crawler = Arc::clone(&state.crawler);
    let batch = urls.clone();

    let value = state
        .flights
        .execute(&key, move || async move {
            let pages = crawler.crawl(&batch).await?;
            Ok(ToolValue::Pages(pages))
        })
        .await?;

    match value {
        ToolValue::Pages(pages) => {
            tracing::info!(count = pages.len(), "completed crawling pages");
            Ok(pages)
        }
        ToolValue::Links(_) => Err(Error::Internal("cache entry kind mismatch".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use skry_core::{AppConfig, CrawlPort, SearchHit, SearchPort};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubCrawler {
        calls: AtomicUsize,
        fail_batch: bool,
    }

    #[async_trait]
    impl CrawlPort for StubCrawler {
        async fn crawl(&self, urls: &[String]) -> Result<PageMap, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_batch {
                return Err(Error::CrawlFailed("crawler offline".into()));
            }
            let mut pages = PageMap::new();
            for url in urls {
                let outcome = if url.contains("broken") {
                    PageOutcome::Failed("status 503".into())
                } else {
                    PageOutcome::Content(format!("# Page at {url}"))
                };
                pages.insert(url.clone(), outcome);
            }
            Ok(pages)
        }
    }

    struct NoSearch;

    #[async_trait]
    impl SearchPort for NoSearch {
        async fn search(&self, _query: &str, _max_results: usize) -> Result<Vec<SearchHit>, Error> {
            panic!("search port must not be called by crawl_urls");
        }
    }

    fn state_with(fail_batch: bool) -> (Arc<AppState>, Arc<StubCrawler>) {
        let crawler = Arc::new(StubCrawler { calls: AtomicUsize::new(0), fail_batch });
        let state = AppState::new(AppConfig::default(), Arc::new(NoSearch), crawler.clone());
        (Arc::new(state), crawler)
    }

    fn result_map(result: &CallToolResult) -> BTreeMap<String, String> {
        let text = result
            .content
            .first()
            .and_then(|c| c.as_text())
            .map(|t| t.text.clone())
            .unwrap_or_default();
        serde_json::from_str(&text).unwrap()
    }

    #[tokio::test]
    async fn test_empty_list_fails_validation() {
        let (state, crawler) = state_with(false);

        let result = crawl_urls_impl(&state, CrawlUrlsParams { urls: vec![] }).await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(crawler.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_url_fails_validation() {
        let (state, crawler) = state_with(false);

        let params = CrawlUrlsParams { urls: vec!["https://ok.example".into(), "not a url".into()] };
        let result = crawl_urls_impl(&state, params).await;

        assert_eq!(result.is_error, Some(true));
        assert_eq!(crawler.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_per_url_entries() {
        let (state, _) = state_with(false);

        let params = CrawlUrlsParams { urls: vec!["https://ok.example/".into(), "https://broken.example/".into()] };
        let result = crawl_urls_impl(&state, params).await;
        assert_ne!(result.is_error, Some(true));

        let pages = result_map(&result);
        assert_eq!(pages.len(), 2);
        assert!(pages["https://ok.example/"].starts_with("# Page at"));
        assert!(pages["https://broken.example/"].starts_with("Error: Failed to crawl this page - "));
    }

    #[tokio::test]
    async fn test_partial_failure_is_cached() {
        let (state, crawler) = state_with(false);
        let params = CrawlUrlsParams { urls: vec!["https://ok.example/".into(), "https://broken.example/".into()] };

        let _ = crawl_urls_impl(&state, params.clone()).await;
        let _ = crawl_urls_impl(&state, params).await;

        assert_eq!(crawler.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_url_order_and_duplicates_share_one_entry() {
        let (state, crawler) = state_with(false);

        let first = CrawlUrlsParams {
            urls: vec!["https://a.example/".into(), "https://b.example/".into(), "https://a.example/".into()],
        };
        let second = CrawlUrlsParams { urls: vec!["https://b.example/".into(), "https://a.example/".into()] };

        let r1 = crawl_urls_impl(&state, first).await;
        let r2 = crawl_urls_impl(&state, second).await;

        assert_eq!(result_map(&r1), result_map(&r2));
        assert_eq!(crawler.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_batch_failure_reported_and_retried() {
        let (state, crawler) = state_with(true);
        let params = CrawlUrlsParams { urls: vec!["https://ok.example/".into()] };

        let result = crawl_urls_impl(&state, params.clone()).await;
        assert_eq!(result.is_error, Some(true));

        let _ = crawl_urls_impl(&state, params).await;
        assert_eq!(crawler.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_batches_coalesce() {
        let (state, crawler) = state_with(false);
        let urls = vec!["https://x.example/".into()];

        let a = {
            let state = Arc::clone(&state);
            let params = CrawlUrlsParams { urls: urls.clone() };
            tokio::spawn(async move { crawl_urls_impl(&state, params).await })
        };
        let b = {
            let state = Arc::clone(&state);
            let params = CrawlUrlsParams { urls };
            tokio::spawn(async move { crawl_urls_impl(&state, params).await })
        };

        let (ra, rb) = (a.await.unwrap(), b.await.unwrap());
        assert_eq!(result_map(&ra), result_map(&rb));
        assert_eq!(crawler.calls.load(Ordering::SeqCst), 1);
    }
}
