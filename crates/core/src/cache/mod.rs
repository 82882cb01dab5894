//! In-memory result cache with request coalescing.
//!
//! This module provides the layer between the tool boundary and the
//! backend ports:
//!
//! - Canonical cache key derivation (SHA-256 over normalized input)
//! - A bounded TTL + LRU store shared by both tool families
//! - A per-key single-flight executor so identical concurrent requests
//!   collapse into one backend call

pub mod flight;
pub mod key;
pub mod store;

pub use flight::SingleFlight;
pub use key::{CacheKey, crawl_key, search_key};
pub use store::CacheStore;
