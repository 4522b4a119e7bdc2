//! Vehicle Search Proxy - A thin caching proxy for vehicle listings search
//!
//! Forwards validated searches to a third-party listings API and keeps
//! non-empty results for 30 minutes to spare upstream calls.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vehicle_search_proxy::{api::create_router, spawn_rate_limit_cleanup_task, AppState, Config};

/// Main entry point for the search proxy.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache, upstream client and gateway
/// 4. Start background rate limit cleanup task
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vehicle_search_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vehicle Search Proxy");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, upstream={}, api_key_configured={}, rate_limit={}/{}s",
        config.server_port,
        config.upstream_base_url,
        config.has_api_key(),
        config.rate_limit_max,
        config.rate_limit_window
    );

    if !config.has_api_key() {
        warn!("MARKETCHECK_API_KEY is not set; uncached searches will fail");
    }
    if !config.cors_strict {
        warn!("CORS allows every origin; set CORS_STRICT=true to enforce the claude.ai/localhost allow-list");
    }
    if config.trust_proxy {
        info!("Rate limiting clients by X-Forwarded-For (TRUST_PROXY)");
    }

    let state = AppState::from_config(&config).context("Failed to initialize application state")?;
    info!("Search gateway initialized");

    let cleanup_handle = spawn_rate_limit_cleanup_task(
        state.rate_limiter.clone(),
        config.rate_limit_cleanup_interval,
    );
    info!("Background rate limit cleanup task started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(cleanup_handle))
    .await
    .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the cleanup task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    cleanup_handle.abort();
    warn!("Cleanup task aborted");
}
