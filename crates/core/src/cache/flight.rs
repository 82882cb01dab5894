//! Per-key request coalescing.
//!
//! [`SingleFlight`] guarantees that concurrent requests for the same key
//! collapse into a single backend invocation: the first miss dispatches
//! the producer, later requesters subscribe to the pending outcome, and
//! everyone observes the same result. Successes populate the store before
//! waiters are notified; failures are never cached, so the next request
//! for that key retries the backend.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use super::key::CacheKey;
use super::store::CacheStore;
use crate::Error;

type Outcome<V> = Result<V, Error>;
type FlightTable<V> = HashMap<CacheKey, broadcast::Sender<Outcome<V>>>;

/// Coalescing executor in front of a [`CacheStore`].
///
/// The in-flight table holds at most one pending request per key. Its
/// mutex only ever guards map operations; backend I/O runs in a spawned
/// task, so a requester that stops waiting never cancels the shared call.
pub struct SingleFlight<V> {
    store: Arc<CacheStore<V>>,
    flights: Arc<Mutex<FlightTable<V>>>,
}

impl<V> Clone for SingleFlight<V> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store), flights: Arc::clone(&self.flights) }
    }
}

impl<V: Clone + Send + 'static> SingleFlight<V> {
    pub fn new(store: Arc<CacheStore<V>>) -> Self {
        Self { store, flights: Arc::new(Mutex::new(HashMap::new())) }
    }

    pub fn store(&self) -> &CacheStore<V> {
        &self.store
    }

    /// Resolve `key` to a value, invoking `producer` at most once across
    /// all concurrent callers.
    ///
    /// Order of preference: live cache entry, then attaching to an
    /// in-flight request, then dispatching the producer.
    pub async fn execute<F, Fut>(&self, key: &CacheKey, producer: F) -> Outcome<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Outcome<V>> + Send + 'static,
    {
        if let Some(value) = self.store.get(key) {
            tracing::debug!(%key, "cache hit");
            return Ok(value);
        }

        let mut rx = {
            let mut table = self.flights.lock();
            match table.get(key) {
                Some(tx) => {
                    tracing::debug!(%key, "joining in-flight request");
                    tx.subscribe()
                }
                None => {
                    // The flight may have resolved between the cache check
                    // and taking the table lock; the store is populated
                    // before the flight entry is removed, so a second look
                    // here is conclusive.
                    if let Some(value) = self.store.get(key) {
                        tracing::debug!(%key, "cache hit");
                        return Ok(value);
                    }

                    tracing::debug!(%key, "cache miss, dispatching backend call");
                    let (tx, rx) = broadcast::channel(1);
                    table.insert(key.clone(), tx.clone());
                    self.spawn_flight(key.clone(), tx, producer());
                    rx
                }
            }
        };

        rx.recv()
            .await
            .unwrap_or_else(|_| Err(Error::Aborted("in-flight request ended without a result".into())))
    }

    fn spawn_flight<Fut>(&self, key: CacheKey, tx: broadcast::Sender<Outcome<V>>, fut: Fut)
    where
        Fut: Future<Output = Outcome<V>> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let flights = Arc::clone(&self.flights);

        tokio::spawn(async move {
            let result = fut.await;

            if let Ok(value) = &result {
                store.put(key.clone(), value.clone());
            }
            flights.lock().remove(&key);

            // Every waiter may have gone away; that is not an error.
            let _ = tx.send(result);
        });
    }
}
