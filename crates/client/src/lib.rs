//! Backend clients for skry.
//!
//! This crate provides the two network backends the cache layer fronts:
//! a DuckDuckGo HTML search client and a bounded-concurrency page crawler
//! built on a shared HTTP fetch pipeline.

pub mod crawl;
pub mod fetch;
pub mod search;

pub use crawl::{CrawlConfig, PageCrawler};
pub use fetch::{FetchClient, FetchConfig, FetchResponse};
pub use search::{DdgClient, SearchConfig};
