//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

/// Default upstream listings search endpoint
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://mc-api.marketcheck.com/v2/search/car/active";

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Upstream API credential, None when unset or empty
    pub api_key: Option<String>,
    /// Upstream search endpoint
    pub upstream_base_url: String,
    /// Maximum requests per client per window
    pub rate_limit_max: u32,
    /// Rate limit window length in seconds
    pub rate_limit_window: u64,
    /// Interval in seconds between pruning closed rate-limit windows
    pub rate_limit_cleanup_interval: u64,
    /// Restrict CORS to the origin allow-list instead of allowing every origin
    pub cors_strict: bool,
    /// Key rate limiting on the first `X-Forwarded-For` hop. Only safe behind
    /// a reverse proxy that overwrites that header.
    pub trust_proxy: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PORT` - HTTP server port (default: 3000)
    /// - `MARKETCHECK_API_KEY` - Upstream credential (default: unset)
    /// - `UPSTREAM_BASE_URL` - Upstream search endpoint (default: MarketCheck active listings)
    /// - `RATE_LIMIT_MAX` - Requests per client per window (default: 100)
    /// - `RATE_LIMIT_WINDOW_SECS` - Window length in seconds (default: 900)
    /// - `RATE_LIMIT_CLEANUP_INTERVAL` - Prune frequency in seconds (default: 60)
    /// - `CORS_STRICT` - Enforce the origin allow-list (default: false)
    /// - `TRUST_PROXY` - Identify clients by `X-Forwarded-For` (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            api_key: env::var("MARKETCHECK_API_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            upstream_base_url: env::var("UPSTREAM_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.upstream_base_url),
            rate_limit_max: env::var("RATE_LIMIT_MAX")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.rate_limit_max),
            rate_limit_window: env::var("RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.rate_limit_window),
            rate_limit_cleanup_interval: env::var("RATE_LIMIT_CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.rate_limit_cleanup_interval),
            cors_strict: env_flag("CORS_STRICT").unwrap_or(defaults.cors_strict),
            trust_proxy: env_flag("TRUST_PROXY").unwrap_or(defaults.trust_proxy),
        }
    }

    /// Returns true if an upstream credential is available.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Reads a boolean switch; `1`, `true` and `yes` turn it on.
fn env_flag(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            api_key: None,
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            rate_limit_max: 100,
            rate_limit_window: 15 * 60,
            rate_limit_cleanup_interval: 60,
            cors_strict: false,
            trust_proxy: false,
        }
    }
}

// Keeps the credential out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server_port", &self.server_port)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("upstream_base_url", &self.upstream_base_url)
            .field("rate_limit_max", &self.rate_limit_max)
            .field("rate_limit_window", &self.rate_limit_window)
            .field("rate_limit_cleanup_interval", &self.rate_limit_cleanup_interval)
            .field("cors_strict", &self.cors_strict)
            .field("trust_proxy", &self.trust_proxy)
            .finish()
    }
}
