//! API Module
//!
//! HTTP handlers, routing and middleware for the search proxy.
//!
//! # Endpoints
//! - `GET /api/search` - Cache-aside vehicle listings search (rate limited)
//! - `GET /health` - Health check with cache size and credential status
//! - `GET /stats` - Cache statistics

pub mod cors;
pub mod handlers;
pub mod rate_limit;
pub mod routes;

pub use handlers::*;
pub use rate_limit::RateLimiter;
pub use routes::create_router;
