//! Bounded in-memory cache with TTL expiry and LRU eviction.
//!
//! The store is a plain map guarded by one mutex; every operation is
//! in-memory and amortized O(1), and the lock is never held across I/O.
//! Expired entries are dropped lazily when read; [`CacheStore::purge_expired`]
//! exists for callers that want a periodic sweep as well.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::key::CacheKey;

struct Entry<V> {
    value: V,
    created_at: Instant,
    stamp: u64,
}

/// Recency bookkeeping: the queue records every touch as `(key, stamp)`;
/// only the record matching the entry's current stamp is live, so a touch
/// is O(1) and stale records are skipped (and periodically compacted)
/// instead of searched for.
struct Inner<V> {
    entries: HashMap<CacheKey, Entry<V>>,
    recency: VecDeque<(CacheKey, u64)>,
    clock: u64,
}

impl<V> Inner<V> {
    fn touch(&mut self, key: &CacheKey) {
        self.clock += 1;
        let stamp = self.clock;
        if let Some(entry) = self.entries.get_mut(key) {
            entry.stamp = stamp;
            self.recency.push_back((key.clone(), stamp));
        }
    }

    fn evict_lru(&mut self) {
        while let Some((key, stamp)) = self.recency.pop_front() {
            let live = self.entries.get(&key).is_some_and(|e| e.stamp == stamp);
            if live {
                self.entries.remove(&key);
                tracing::debug!(%key, "evicted least-recently-used cache entry");
                return;
            }
        }
    }

    fn compact(&mut self) {
        let entries = &self.entries;
        self.recency.retain(|(key, stamp)| entries.get(key).is_some_and(|e| e.stamp == *stamp));
    }
}

/// Bounded mapping from [`CacheKey`] to a cached value, with time-based
/// expiry and least-recently-used eviction on overflow.
///
/// The store has no knowledge of what a key or value means; both tool
/// families share one instance.
pub struct CacheStore<V> {
    inner: Mutex<Inner<V>>,
    max_entries: usize,
    ttl: Duration,
}

impl<V: Clone> CacheStore<V> {
    /// Create a store holding at most `max_entries` values, each served
    /// for at most `ttl` past its insertion.
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner { entries: HashMap::new(), recency: VecDeque::new(), clock: 0 }),
            max_entries,
            ttl,
        }
    }

    /// Look up a live value, refreshing its recency.
    ///
    /// An entry at or past its TTL is removed and reported as a miss.
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let mut inner = self.inner.lock();

        let expired = match inner.entries.get(key) {
            Some(entry) => entry.created_at.elapsed() >= self.ttl,
            None => return None,
        };

        if expired {
            inner.entries.remove(key);
            tracing::debug!(%key, "dropped expired cache entry");
            return None;
        }

        inner.touch(key);
        if inner.recency.len() > inner.entries.len() * 2 + 16 {
            inner.compact();
        }
        inner.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Insert a value, evicting least-recently-used entries if the store
    /// would exceed its capacity. Re-inserting a key resets its age.
    pub fn put(&self, key: CacheKey, value: V) {
        let mut inner = self.inner.lock();

        inner.clock += 1;
        let stamp = inner.clock;
        inner.recency.push_back((key.clone(), stamp));
        inner.entries.insert(key, Entry { value, created_at: Instant::now(), stamp });

        while inner.entries.len() > self.max_entries {
            inner.evict_lru();
        }

        if inner.recency.len() > inner.entries.len() * 2 + 16 {
            inner.compact();
        }
    }

    /// Number of entries currently held, expired or not.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry at or past its TTL, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut inner = self.inner.lock();
        let ttl = self.ttl;

        let before = inner.entries.len();
        inner.entries.retain(|_, entry| entry.created_at.elapsed() < ttl);
        let removed = before - inner.entries.len();

        if removed > 0 {
            inner.compact();
            tracing::debug!(removed, "purged expired cache entries");
        }
        removed
    }
}
