//! Listing Cache Module
//!
//! Time-bounded lookaside cache for upstream search payloads. Expiry is lazy:
//! a stale entry is removed by the read that discovers it, nothing sweeps the
//! map in the background.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock, CACHE_TTL_MS};

// == Listing Cache ==
/// Cache of upstream payloads keyed by search descriptor.
#[derive(Debug)]
pub struct ListingCache {
    /// Key to entry storage
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
    /// Lifetime of an entry in milliseconds
    ttl_ms: u64,
    /// Time source for stamping and expiry checks
    clock: Arc<dyn Clock>,
}

impl ListingCache {
    // == Constructor ==
    /// Creates an empty cache with the standard 30 minute TTL on the wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty cache with the standard TTL on the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(CACHE_TTL_MS, clock)
    }

    /// Creates an empty cache with a custom TTL in milliseconds.
    pub fn with_ttl(ttl_ms: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            ttl_ms,
            clock,
        }
    }

    // == Get ==
    /// Returns a copy of the payload stored under `key` if it is still live.
    ///
    /// A stale entry is deleted here and reported as a miss.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let now = self.clock.now_ms();

        match self.entries.get(key) {
            Some(entry) if entry.is_expired(now, self.ttl_ms) => {
                debug!(key = %key, age_ms = entry.age_ms(now), "Expired cache entry removed");
                self.entries.remove(key);
                self.stats.set_total_entries(self.entries.len());
                self.stats.record_expiration();
                None
            }
            Some(entry) => {
                debug!(
                    key = %key,
                    ttl_remaining_ms = entry.ttl_remaining_ms(now, self.ttl_ms),
                    "Live cache entry"
                );
                self.stats.record_hit();
                Some(entry.payload.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Insert ==
    /// Stores `payload` under `key`, stamped with the current time.
    ///
    /// An existing entry for the same key is replaced (last write wins).
    pub fn insert(&mut self, key: String, payload: Value) {
        let entry = CacheEntry::new(payload, self.clock.now_ms());
        self.entries.insert(key, entry);
        self.stats.record_store();
        self.stats.set_total_entries(self.entries.len());
    }

    // == Contains Key ==
    /// Whether an entry, live or stale, is held under `key`. Does not expire anything.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }

    // == Length ==
    /// Returns the current number of entries, including stale ones not yet read.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ListingCache {
    fn default() -> Self {
        Self::new()
    }
}
