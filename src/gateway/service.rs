//! Search Gateway
//!
//! Cache-aside lookup in front of the listings API: validate, read the
//! cache, otherwise call upstream once and remember non-empty results.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{cache_key, ListingCache};
use crate::error::{GatewayError, Result};
use crate::models::{empty_results, QueryDescriptor};
use crate::upstream::ListingsSource;

// == Search Gateway ==
/// Gateway between inbound searches and the upstream listings API.
///
/// The cache handle is shared with the rest of the application; the lock is
/// only held for single get/insert steps, never across the upstream call.
pub struct SearchGateway {
    /// Shared lookaside cache
    cache: Arc<RwLock<ListingCache>>,
    /// Upstream listings API
    source: Arc<dyn ListingsSource>,
    /// Upstream credential, None when not configured
    api_key: Option<String>,
    /// Number of searches sent upstream
    upstream_calls: AtomicU64,
}

impl SearchGateway {
    // == Constructor ==
    pub fn new(
        cache: Arc<RwLock<ListingCache>>,
        source: Arc<dyn ListingsSource>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            cache,
            source,
            api_key,
            upstream_calls: AtomicU64::new(0),
        }
    }

    pub fn cache(&self) -> &Arc<RwLock<ListingCache>> {
        &self.cache
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn upstream_calls(&self) -> u64 {
        self.upstream_calls.load(Ordering::Relaxed)
    }

    // == Lookup ==
    /// Resolves a search, from cache when possible.
    ///
    /// # Returns
    /// - the cached payload with `"cached": true` added, on a live hit
    /// - `{"listings": [], "count": 0}` when upstream found nothing or replied
    ///   with a blank body (not cached)
    /// - the upstream payload unmodified otherwise, after caching it
    ///
    /// # Errors
    /// - `Validation` if make, model, year or zip is missing; nothing else is touched
    /// - `Configuration` on a cache miss with no credential configured
    /// - `Upstream` carrying the upstream status and body for non-2xx replies
    /// - `Unexpected` for transport failures and undecodable bodies
    pub async fn lookup(&self, descriptor: &QueryDescriptor) -> Result<Value> {
        if let Err(err) = descriptor.validate() {
            warn!("Rejected search: {}", err);
            return Err(err);
        }

        let key = cache_key(descriptor);

        let cached = self.cache.write().await.get(&key);
        if let Some(payload) = cached {
            info!(key = %key, "Cache hit");
            return Ok(mark_cached(payload));
        }
        debug!(key = %key, "Cache miss");

        let api_key = self.api_key.as_deref().ok_or_else(|| {
            GatewayError::Configuration(
                "Set the MARKETCHECK_API_KEY environment variable to enable searches".to_string(),
            )
        })?;

        self.upstream_calls.fetch_add(1, Ordering::Relaxed);
        let response = self.source.search(api_key, descriptor).await?;

        if !response.is_success() {
            warn!(status = response.status, "Upstream search failed");
            return Err(GatewayError::Upstream {
                status: response.status,
                body: response.body,
            });
        }

        if response.body.trim().is_empty() {
            info!(
                key = %key,
                status = response.status,
                "Upstream returned an empty body, not caching"
            );
            return Ok(empty_results());
        }

        let payload: Value = serde_json::from_str(&response.body)?;

        if !has_listings(&payload) {
            info!(key = %key, "Upstream returned no listings, not caching");
            return Ok(empty_results());
        }

        self.cache.write().await.insert(key.clone(), payload.clone());
        info!(key = %key, "Cached upstream results");

        Ok(payload)
    }
}

/// True when the payload carries a non-empty `listings` array.
fn has_listings(payload: &Value) -> bool {
    payload
        .get("listings")
        .and_then(Value::as_array)
        .is_some_and(|listings| !listings.is_empty())
}

/// Flags a payload as served from cache.
fn mark_cached(mut payload: Value) -> Value {
    if let Value::Object(map) = &mut payload {
        map.insert("cached".to_string(), Value::Bool(true));
    }
    payload
}
