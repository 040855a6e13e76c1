// sentinel-core/src/application/cache.rs

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, trace};

use crate::ports::clock::Clock;

struct Entry<V> {
    value: V,
    cached_at: DateTime<Utc>,
}

/// Time-to-live memoization of query results.
///
/// One entry per key, no size bound: the key space is the fixed query
/// catalog. Values are cloned out, so cache `Arc<T>` to hand every caller
/// the same object.
pub struct QueryCache<V> {
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, Entry<V>>>,
}

impl<V: Clone> QueryCache<V> {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key` while `now - cached_at < ttl`,
    /// otherwise awaits `fetch` and stores its result. A failed fetch is
    /// returned as-is and leaves the cache untouched.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, ttl: Duration, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.lookup(key, ttl) {
            trace!(key, "cache hit");
            return Ok(value);
        }

        debug!(key, "cache miss, fetching");
        let value = fetch().await?;

        let cached_at = self.clock.now();
        self.lock().insert(
            key.to_string(),
            Entry {
                value: value.clone(),
                cached_at,
            },
        );
        Ok(value)
    }

    /// Drops every entry regardless of age.
    pub fn clear(&self) {
        let mut entries = self.lock();
        debug!(entries = entries.len(), "🧹 Clearing query cache");
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lookup(&self, key: &str, ttl: Duration) -> Option<V> {
        let now = self.clock.now();
        let entries = self.lock();
        let entry = entries.get(key)?;
        is_fresh(entry.cached_at, now, ttl).then(|| entry.value.clone())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// A clock that went backwards yields a negative age: still fresh.
fn is_fresh(cached_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    match (now - cached_at).to_std() {
        Ok(age) => age < ttl,
        Err(_) => true,
    }
}
