//! API Handlers
//!
//! HTTP request handlers for each search proxy endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde_json::Value;
use tokio::sync::RwLock;

use super::rate_limit::RateLimiter;
use crate::cache::ListingCache;
use crate::config::Config;
use crate::error::{GatewayError, Result};
use crate::gateway::SearchGateway;
use crate::models::{HealthResponse, SearchQuery, StatsResponse};
use crate::upstream::{HttpListingsClient, ListingsSource};

/// Application state shared across all handlers.
///
/// The cache is created once here and reached by handlers only through
/// the gateway it is handed to.
#[derive(Clone)]
pub struct AppState {
    /// Cache-aside search path
    pub gateway: Arc<SearchGateway>,
    /// Per-client request limiter for the search route
    pub rate_limiter: Arc<RateLimiter>,
    /// Enforce the CORS origin allow-list
    pub cors_strict: bool,
    /// Identify clients by `X-Forwarded-For` instead of the socket peer
    pub trust_proxy: bool,
}

impl AppState {
    /// Creates a new AppState around an existing gateway and limiter.
    pub fn new(gateway: SearchGateway, rate_limiter: RateLimiter) -> Self {
        Self {
            gateway: Arc::new(gateway),
            rate_limiter: Arc::new(rate_limiter),
            cors_strict: false,
            trust_proxy: false,
        }
    }

    /// Creates an AppState with a fresh cache over the given listings source.
    pub fn with_source(source: Arc<dyn ListingsSource>, config: &Config) -> Self {
        let cache = Arc::new(RwLock::new(ListingCache::new()));
        let gateway = SearchGateway::new(cache, source, config.api_key.clone());
        let rate_limiter = RateLimiter::new(config.rate_limit_max, config.rate_limit_window);

        Self {
            cors_strict: config.cors_strict,
            trust_proxy: config.trust_proxy,
            ..Self::new(gateway, rate_limiter)
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds the HTTP listings client for the configured upstream endpoint.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = HttpListingsClient::new(config.upstream_base_url.clone())?;
        Ok(Self::with_source(Arc::new(client), config))
    }
}

/// Handler for GET /api/search
///
/// Runs a cache-aside listings search for `make`, `model`, `year`, `zip`
/// and the optional `radius` and `rows`. A query string that cannot be
/// decoded at all is reported as a validation error.
pub async fn search_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Value>> {
    let Query(query) =
        query.map_err(|rejection| GatewayError::Validation(rejection.body_text()))?;
    let descriptor = query.into_descriptor()?;
    let payload = state.gateway.lookup(&descriptor).await?;

    Ok(Json(payload))
}

/// Handler for GET /health
///
/// Reports cache size and whether an upstream credential is configured.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache_size = state.gateway.cache().read().await.len();

    Json(HealthResponse::healthy(
        cache_size,
        state.gateway.has_api_key(),
    ))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.gateway.cache().read().await.stats();

    Json(StatsResponse::new(&stats, state.gateway.upstream_calls()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::scripted::ScriptedSource;

    fn state_with(api_key: Option<&str>, body: &str) -> (AppState, Arc<ScriptedSource>) {
        let source = Arc::new(ScriptedSource::new(200, body));
        let config = Config {
            api_key: api_key.map(str::to_string),
            ..Config::default()
        };
        (AppState::with_source(source.clone(), &config), source)
    }

    fn camry_query() -> SearchQuery {
        SearchQuery {
            make: Some("Toyota".to_string()),
            model: Some("Camry".to_string()),
            year: Some("2022".to_string()),
            zip: Some("94103".to_string()),
            ..SearchQuery::default()
        }
    }

    #[tokio::test]
    async fn test_search_handler_miss_then_hit() {
        let (state, source) = state_with(Some("key"), r#"{"listings":[{"id":1}],"num_found":1}"#);

        let first = search_handler(State(state.clone()), Ok(Query(camry_query())))
            .await
            .unwrap();
        assert!(first.0.get("cached").is_none());

        let second = search_handler(State(state.clone()), Ok(Query(camry_query())))
            .await
            .unwrap();
        assert_eq!(second.0["cached"], true);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_search_handler_missing_fields() {
        let (state, source) = state_with(Some("key"), "{}");

        let result = search_handler(State(state), Ok(Query(SearchQuery::default()))).await;

        match result {
            Err(GatewayError::Validation(msg)) => {
                assert_eq!(msg, "Missing required parameters: make, model, year, zip")
            }
            _ => panic!("Expected validation error"),
        }
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let (state, _) = state_with(None, "{}");

        let response = health_handler(State(state)).await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.cache_size, 0);
        assert!(!response.api_key_configured);
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let (state, _) = state_with(Some("key"), r#"{"listings":[{"id":1}]}"#);
        search_handler(State(state.clone()), Ok(Query(camry_query())))
            .await
            .unwrap();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.misses, 1);
        assert_eq!(response.stores, 1);
        assert_eq!(response.total_entries, 1);
        assert_eq!(response.upstream_calls, 1);
    }
}
