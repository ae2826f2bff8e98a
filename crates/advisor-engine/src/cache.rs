//! Time-bounded cache for generated answers.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Marker appended to answers served from the cache.
pub const CACHED_MARKER: &str = "\n\n(Cached response)";

/// Default time a cached answer stays servable.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(600);

struct CachedAnswer {
    text: String,
    stored_at: Instant,
}

/// In-memory answer cache keyed by normalized query text.
///
/// Expiry is checked lazily at lookup; stale entries stay in the map
/// until a store overwrites them, so the entry count is bounded by the
/// number of distinct normalized queries, not by request volume.
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CachedAnswer>>,
    ttl: Duration,
}

impl ResponseCache {
    /// Create a cache with the given time-to-live.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Look up a still-valid answer for the key.
    ///
    /// An entry whose age has reached the TTL is reported as absent.
    pub fn lookup(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap();
        entries
            .get(key)
            .filter(|hit| hit.stored_at.elapsed() < self.ttl)
            .map(|hit| hit.text.clone())
    }

    /// Store an answer, overwriting any prior entry for the key.
    pub fn store(&self, key: &str, text: &str) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key.to_string(),
            CachedAnswer {
                text: text.to_string(),
                stored_at: Instant::now(),
            },
        );
    }

    /// Number of stored entries, counting not-yet-overwritten stale ones.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Check whether the cache holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}
