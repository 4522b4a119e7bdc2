//! Rate Limiting
//!
//! Fixed-window request counter per client, applied as axum middleware in
//! front of the search route.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use tracing::warn;

use super::handlers::AppState;
use crate::cache::{Clock, SystemClock};
use crate::error::{GatewayError, Result};

/// Counter for one client's current window.
#[derive(Debug, Clone, Copy)]
struct Window {
    /// Window start (Unix milliseconds)
    started_at: u64,
    /// Requests seen in this window
    count: u32,
}

// == Rate Limiter ==
/// Allows at most `max_requests` per client in each window.
///
/// A client's window opens with its first request and resets once
/// `window_ms` has elapsed since then.
#[derive(Debug)]
pub struct RateLimiter {
    windows: Mutex<HashMap<String, Window>>,
    max_requests: u32,
    window_ms: u64,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    /// Creates a limiter on the wall clock.
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self::with_clock(max_requests, window_secs, Arc::new(SystemClock))
    }

    pub fn with_clock(max_requests: u32, window_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            max_requests,
            window_ms: window_secs.saturating_mul(1000),
            clock,
        }
    }

    // == Check ==
    /// Records one request from `client` and returns how many remain.
    ///
    /// Fails with `RateLimited` (carrying the seconds until the window
    /// resets) once the client has used up its allowance.
    pub async fn check(&self, client: &str) -> Result<u32> {
        let now = self.clock.now_ms();
        let mut windows = self.windows.lock().await;

        let window = windows.entry(client.to_string()).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if now.saturating_sub(window.started_at) >= self.window_ms {
            *window = Window {
                started_at: now,
                count: 0,
            };
        }

        if window.count >= self.max_requests {
            let reset_in_ms = (window.started_at + self.window_ms).saturating_sub(now);
            return Err(GatewayError::RateLimited {
                retry_after_secs: reset_in_ms.div_ceil(1000),
            });
        }

        window.count += 1;
        Ok(self.max_requests - window.count)
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    // == Remaining ==
    /// Requests `client` may still make in its current window.
    pub async fn remaining(&self, client: &str) -> u32 {
        let now = self.clock.now_ms();
        let windows = self.windows.lock().await;

        match windows.get(client) {
            Some(w) if now.saturating_sub(w.started_at) < self.window_ms => {
                self.max_requests.saturating_sub(w.count)
            }
            _ => self.max_requests,
        }
    }

    // == Prune ==
    /// Drops windows that have closed. Returns how many were removed.
    pub async fn prune_expired(&self) -> usize {
        let now = self.clock.now_ms();
        let mut windows = self.windows.lock().await;

        let before = windows.len();
        windows.retain(|_, w| now.saturating_sub(w.started_at) < self.window_ms);
        before - windows.len()
    }

    /// Number of clients with a tracked window.
    pub async fn tracked_clients(&self) -> usize {
        self.windows.lock().await.len()
    }
}

// == Client Identity ==
/// Identifies the caller by its socket peer address.
///
/// With `trust_proxy` the first `X-Forwarded-For` hop takes precedence; the
/// header is client-controlled unless a proxy in front rewrites it.
pub fn client_id(request: &Request, trust_proxy: bool) -> String {
    if trust_proxy {
        let forwarded = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn insert_limit_headers(response: &mut Response, limit: u32, remaining: u32) {
    let headers = response.headers_mut();
    headers.insert("ratelimit-limit", HeaderValue::from(limit));
    headers.insert("ratelimit-remaining", HeaderValue::from(remaining));
}

// == Middleware ==
/// Rejects the request with 429 once the caller's window is exhausted.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_id(&request, state.trust_proxy);
    let limit = state.rate_limiter.max_requests();

    match state.rate_limiter.check(&client).await {
        Ok(remaining) => {
            let mut response = next.run(request).await;
            insert_limit_headers(&mut response, limit, remaining);
            response
        }
        Err(err) => {
            warn!(client = %client, "Rate limit exceeded");
            let mut response = err.into_response();
            insert_limit_headers(&mut response, limit, 0);
            response
        }
    }
}
