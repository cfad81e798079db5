//! In memory cache of anonymous responses.
//!
//! Entries are keyed by the url of the single resource request (eg: `v2/items/12?lang=en`),
//! so that `single` and `many` share entries. Values are kept as json, the clients deserialize on the way out.
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::trace;

use crate::request::CachePolicy;

/// longer ttls (eg: a huge `max-age`) are cut down to this
pub const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

#[derive(Debug)]
struct Entry {
    value: Arc<Value>,
    expires_at: Instant,
}

#[derive(Debug)]
pub struct ResponseCache {
    default_ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl ResponseCache {
    /// `default_ttl` applies to responses without a `Cache-Control: max-age`
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            default_ttl,
            entries: Mutex::default(),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
        // the map is never left half updated, so a poisoned lock is still usable
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &str) -> Option<Arc<Value>> {
        let mut entries = self.entries();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                trace!(key, "cache hit");
                Some(entry.value.clone())
            }
            Some(_) => {
                trace!(key, "cache entry expired");
                entries.remove(key);
                None
            }
            None => {
                trace!(key, "cache miss");
                None
            }
        }
    }

    /// returns false if the policy forbids caching
    pub fn insert(&self, key: String, value: Value, policy: CachePolicy) -> bool {
        let ttl = match policy {
            CachePolicy::Skip => return false,
            CachePolicy::Default => self.default_ttl,
            CachePolicy::For(ttl) => ttl,
        };
        if ttl.is_zero() {
            return false;
        }
        let Some(expires_at) = Instant::now().checked_add(ttl.min(MAX_TTL)) else {
            return false;
        };
        trace!(%key, ?ttl, "caching response");
        self.entries().insert(
            key,
            Entry {
                value: Arc::new(value),
                expires_at,
            },
        );
        true
    }

    /// drops expired entries and returns how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    /// number of entries that have not expired yet
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries()
            .values()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
