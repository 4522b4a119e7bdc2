//! API Routes
//!
//! Configures the Axum router with all search proxy endpoints.

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::cors::cors_layer;
use super::handlers::{health_handler, search_handler, stats_handler, AppState};
use super::rate_limit::rate_limit_middleware;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/search` - Listings search
/// - `GET /health` - Health check endpoint
/// - `GET /stats` - Cache statistics
///
/// # Middleware
/// - Rate limit: per-client fixed window, `/api` routes only
/// - CORS: any origin unless `cors_strict` is set
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/search", get(search_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .merge(api)
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .layer(cors_layer(state.cors_strict))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::upstream::scripted::ScriptedSource;
    use axum::{
        body::Body,
        extract::ConnectInfo,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn create_test_app(config: Config) -> Router {
        let source = Arc::new(ScriptedSource::new(200, r#"{"listings":[{"id":1}]}"#));
        create_router(AppState::with_source(source, &config))
    }

    const CAMRY_SEARCH: &str = "/api/search?make=Toyota&model=Camry&year=2022&zip=94103";

    fn from_peer(uri: &str, peer: [u8; 4], forwarded_for: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = forwarded_for {
            builder = builder.header("x-forwarded-for", value);
        }
        let mut request = builder.body(Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from((peer, 40000))));
        request
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app(Config::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_search_missing_params() {
        let app = create_test_app(Config::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/search?make=Toyota")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_without_key() {
        let app = create_test_app(Config::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri(CAMRY_SEARCH)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_search_malformed_query_is_json_error() {
        let app = create_test_app(Config {
            api_key: Some("key".to_string()),
            ..Config::default()
        });

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/search?make=Toyota&make=Honda&model=Camry&year=2022&zip=94103")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()["content-type"], "application/json");
        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("duplicate field"));
    }

    #[tokio::test]
    async fn test_rate_limit_applies_to_search_only() {
        let app = create_test_app(Config {
            api_key: Some("key".to_string()),
            rate_limit_max: 1,
            ..Config::default()
        });
        let peer = [198, 51, 100, 4];

        let first = app
            .clone()
            .oneshot(from_peer(CAMRY_SEARCH, peer, None))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(first.headers()["ratelimit-limit"], "1");
        assert_eq!(first.headers()["ratelimit-remaining"], "0");

        let second = app
            .clone()
            .oneshot(from_peer(CAMRY_SEARCH, peer, None))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(second.headers()["ratelimit-limit"], "1");
        assert_eq!(second.headers()["ratelimit-remaining"], "0");
        assert!(second.headers().contains_key("retry-after"));

        let other = app
            .clone()
            .oneshot(from_peer(CAMRY_SEARCH, [198, 51, 100, 5], None))
            .await
            .unwrap();
        assert_eq!(other.status(), StatusCode::OK);

        let health = app
            .oneshot(from_peer("/health", peer, None))
            .await
            .unwrap();
        assert_eq!(health.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rate_limit_ignores_spoofed_forwarded_for() {
        let app = create_test_app(Config {
            api_key: Some("key".to_string()),
            rate_limit_max: 1,
            ..Config::default()
        });
        let peer = [203, 0, 113, 9];

        let mut allowed = 0;
        for i in 0..5 {
            let forwarded = format!("10.0.0.{}", i);
            let response = app
                .clone()
                .oneshot(from_peer(CAMRY_SEARCH, peer, Some(&forwarded)))
                .await
                .unwrap();
            if response.status() != StatusCode::TOO_MANY_REQUESTS {
                allowed += 1;
            }
        }

        assert_eq!(allowed, 1);
    }

    #[tokio::test]
    async fn test_rate_limit_trusted_proxy_keys_on_forwarded_for() {
        let app = create_test_app(Config {
            api_key: Some("key".to_string()),
            rate_limit_max: 1,
            trust_proxy: true,
            ..Config::default()
        });
        let proxy = [10, 1, 0, 1];

        let first = app
            .clone()
            .oneshot(from_peer(CAMRY_SEARCH, proxy, Some("198.51.100.20")))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let repeat = app
            .clone()
            .oneshot(from_peer(CAMRY_SEARCH, proxy, Some("198.51.100.20")))
            .await
            .unwrap();
        assert_eq!(repeat.status(), StatusCode::TOO_MANY_REQUESTS);

        let other = app
            .oneshot(from_peer(CAMRY_SEARCH, proxy, Some("198.51.100.21")))
            .await
            .unwrap();
        assert_eq!(other.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cors_permissive_by_default() {
        let app = create_test_app(Config::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("origin", "https://anywhere.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_cors_strict_rejects_unknown_origin() {
        let config = Config {
            cors_strict: true,
            ..Config::default()
        };

        let response = create_test_app(config.clone())
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("origin", "https://anywhere.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response
            .headers()
            .get("access-control-allow-origin")
            .is_none());

        let response = create_test_app(config)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("origin", "https://claude.ai")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "https://claude.ai"
        );
    }
}
