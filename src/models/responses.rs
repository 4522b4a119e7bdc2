//! Response DTOs for the search proxy API
//!
//! Search payloads themselves are opaque upstream JSON; only the
//! proxy's own bodies are typed here.

use serde::Serialize;
use serde_json::{json, Value};

use crate::cache::CacheStats;

/// Body returned when the upstream search matched nothing.
pub fn empty_results() -> Value {
    json!({ "listings": [], "count": 0 })
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Lookups served from cache
    pub hits: u64,
    /// Lookups that had to go upstream (or failed before it)
    pub misses: u64,
    /// Stale entries removed on read
    pub expirations: u64,
    /// Payloads written to the cache
    pub stores: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Requests sent to the upstream API
    pub upstream_calls: u64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(stats: &CacheStats, upstream_calls: u64) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            stores: stats.stores,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
            upstream_calls,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Number of entries currently held in the cache
    pub cache_size: usize,
    /// Whether an upstream credential is configured
    pub api_key_configured: bool,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(cache_size: usize, api_key_configured: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            cache_size,
            api_key_configured,
        }
    }
}
