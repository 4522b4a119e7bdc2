//! Cache Entry Module
//!
//! Defines a single cached upstream payload and its age checks.

use serde_json::Value;

// == Cache Entry ==
/// A cached upstream payload with the time it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Upstream JSON payload, returned as-is
    pub payload: Value,
    /// Storage timestamp (Unix milliseconds)
    pub stored_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with `stored_at`.
    pub fn new(payload: Value, stored_at: u64) -> Self {
        Self {
            payload,
            stored_at,
        }
    }

    // == Age ==
    /// Milliseconds since the entry was stored. Zero if `now` precedes `stored_at`.
    pub fn age_ms(&self, now: u64) -> u64 {
        now.saturating_sub(self.stored_at)
    }

    // == Is Expired ==
    /// Checks whether the entry is stale at `now`.
    ///
    /// An entry is live only while `now - stored_at < ttl_ms`; at exactly
    /// `ttl_ms` of age it is expired.
    pub fn is_expired(&self, now: u64, ttl_ms: u64) -> bool {
        self.age_ms(now) >= ttl_ms
    }

    // == Time To Live ==
    /// Remaining lifetime in milliseconds, `0` once expired.
    pub fn ttl_remaining_ms(&self, now: u64, ttl_ms: u64) -> u64 {
        ttl_ms.saturating_sub(self.age_ms(now))
    }
}
