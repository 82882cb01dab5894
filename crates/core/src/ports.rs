//! Backend interfaces the cache layer calls.
//!
//! The core never talks to the network directly: the search provider and
//! the page crawler sit behind these traits so tools can be exercised with
//! stub backends in tests and the real clients can be swapped without
//! touching the cache layer.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Error;

/// One matched page from the search provider, in relevance order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Result URL.
    pub url: String,
    /// Page title.
    pub title: String,
    /// Short body snippet, when the provider supplies one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// Per-URL result of a batch crawl.
///
/// A batch always maps every requested URL to exactly one outcome; an
/// unreachable or unrenderable page yields `Failed` for that URL rather
/// than failing the whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageOutcome {
    /// Rendered markdown content.
    Content(String),
    /// Human-readable reason the page could not be crawled.
    Failed(String),
}

impl PageOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, PageOutcome::Failed(_))
    }
}

/// Batch crawl result: one outcome per requested URL.
pub type PageMap = BTreeMap<String, PageOutcome>;

/// Web search provider.
#[async_trait]
pub trait SearchPort: Send + Sync {
    /// Search the web, returning at most `max_results` hits in provider
    /// (relevance) order.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, Error>;
}

/// Page crawler.
#[async_trait]
pub trait CrawlPort: Send + Sync {
    /// Crawl every URL in `urls`, returning one [`PageOutcome`] per URL.
    ///
    /// `Err` is reserved for whole-batch failures; individual pages report
    /// through [`PageOutcome::Failed`].
    async fn crawl(&self, urls: &[String]) -> Result<PageMap, Error>;
}
