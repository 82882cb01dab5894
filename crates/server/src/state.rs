//! Shared server state.
//!
//! Constructed once at startup from the loaded configuration and handed
//! to every tool call. Both tools share one cache store (and one capacity
//! budget), mirroring the single cache instance this server has always
//! run with; the key family tag keeps their entries apart.

use std::sync::Arc;

use skry_core::{AppConfig, CacheStore, CrawlPort, PageMap, SearchHit, SearchPort, SingleFlight};

/// Cached payload for either tool family.
#[derive(Debug, Clone)]
pub enum ToolValue {
    /// Search results for a query key.
    Links(Vec<SearchHit>),
    /// Batch crawl results for a URL-set key.
    Pages(PageMap),
}

/// Shared state behind every tool call.
pub struct AppState {
    pub config: AppConfig,
    pub flights: SingleFlight<ToolValue>,
    pub search: Arc<dyn SearchPort>,
    pub crawler: Arc<dyn CrawlPort>,
}

impl AppState {
    pub fn new(config: AppConfig, search: Arc<dyn SearchPort>, crawler: Arc<dyn CrawlPort>) -> Self {
        let store = Arc::new(CacheStore::new(config.cache_max_size, config.cache_ttl()));
        Self { config, flights: SingleFlight::new(store), search, crawler }
    }
}
