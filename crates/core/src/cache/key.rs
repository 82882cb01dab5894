//! Canonical cache key derivation.
//!
//! Keys are SHA-256 digests of normalized request input, so semantically
//! equivalent requests always land on the same cache entry. A family tag
//! ("search" / "crawl") is mixed into each digest; the two request kinds
//! share one store and must never collide.

use std::collections::BTreeSet;
use std::fmt;

use sha2::{Digest, Sha256};

/// Opaque, comparable cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the cache key for a search query.
///
/// The query is trimmed but otherwise hashed verbatim: lookups are
/// case-sensitive, since providers treat case as meaningful in quoted
/// phrases and operators.
pub fn search_key(query: &str) -> CacheKey {
    let mut hasher = Sha256::new();
    hasher.update(b"search\n");
    hasher.update(query.trim().as_bytes());
    CacheKey(hex::encode(hasher.finalize()))
}

/// Derive the cache key for a batch of URLs.
///
/// URLs are deduplicated and sorted by byte order before hashing, so any
/// permutation or duplication of the same URL set yields the identical
/// key. Callers validate non-empty input before deriving.
pub fn crawl_key<S: AsRef<str>>(urls: &[S]) -> CacheKey {
    let canonical: BTreeSet<&str> = urls.iter().map(|u| u.as_ref()).collect();

    let mut hasher = Sha256::new();
    hasher.update(b"crawl");
    for url in canonical {
        hasher.update(b"\n");
        hasher.update(url.as_bytes());
    }
    CacheKey(hex::encode(hasher.finalize()))
}
