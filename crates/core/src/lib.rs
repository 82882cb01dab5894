//! Core types and shared functionality for skry.
//!
//! This crate provides:
//! - In-memory TTL + LRU cache with per-key request coalescing
//! - Backend port traits for the search provider and page crawler
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod ports;

pub use cache::{CacheKey, CacheStore, SingleFlight, crawl_key, search_key};
pub use config::AppConfig;
pub use error::Error;
pub use ports::{CrawlPort, PageMap, PageOutcome, SearchHit, SearchPort};
