//! Bounded-concurrency page crawler.
//!
//! Fetches a batch of URLs in parallel, renders each page to markdown,
//! and reports one outcome per URL. A page that cannot be fetched or
//! rendered fails alone; it never takes the batch down with it.

pub mod markdown;

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use skry_core::{CrawlPort, Error, PageMap, PageOutcome};

use crate::fetch::{FetchClient, FetchConfig};

/// Configuration for the page crawler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Maximum pages fetched concurrently (default: 4).
    pub concurrency: usize,
    /// Fetch pipeline settings.
    pub fetch: FetchConfig,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self { concurrency: 4, fetch: FetchConfig::default() }
    }
}

/// Page crawler backed by the HTTP fetch pipeline.
pub struct PageCrawler {
    fetcher: Arc<FetchClient>,
    semaphore: Arc<Semaphore>,
}

impl PageCrawler {
    /// Create a new crawler with the given configuration.
    pub fn new(config: CrawlConfig) -> Result<Self, Error> {
        Ok(Self {
            fetcher: Arc::new(FetchClient::new(config.fetch)?),
            semaphore: Arc::new(Semaphore::new(config.concurrency.max(1))),
        })
    }

    async fn crawl_one(fetcher: &FetchClient, url: &str) -> Result<String, Error> {
        let response = fetcher.fetch(url).await?;
        markdown::render_page(&response, &Utc::now())
    }
}

#[async_trait]
impl CrawlPort for PageCrawler {
    async fn crawl(&self, urls: &[String]) -> Result<PageMap, Error> {
        tracing::info!(count = urls.len(), "crawling pages");

        let mut join_set = JoinSet::new();
        let mut seen = HashSet::new();

        for url in urls {
            if !seen.insert(url.clone()) {
                continue;
            }

            let permit = Arc::clone(&self.semaphore)
                .acquire_owned()
                .await
                .map_err(|e| Error::CrawlFailed(e.to_string()))?;
            let fetcher = Arc::clone(&self.fetcher);
            let url = url.clone();

            join_set.spawn(async move {
                // NOTE: Hold permit for task duration to enforce concurrency limit
                let _permit = permit;
                let outcome = match Self::crawl_one(&fetcher, &url).await {
                    Ok(rendered) => PageOutcome::Content(rendered),
                    Err(e) => {
                        tracing::warn!(%url, error = %e, "failed to crawl page");
                        PageOutcome::Failed(e.to_string())
                    }
                };
                (url, outcome)
            });
        }

        let mut pages = PageMap::new();
        while let Some(joined) = join_set.join_next().await {
            let (url, outcome) = joined.map_err(|e| Error::CrawlFailed(e.to_string()))?;
            pages.insert(url, outcome);
        }

        let succeeded = pages.values().filter(|o| !o.is_failed()).count();
        tracing::info!(succeeded, total = pages.len(), "crawl batch finished");

        Ok(pages)
    }
}
