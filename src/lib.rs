//! Vehicle Search Proxy - A thin caching proxy for vehicle listings search
//!
//! Forwards validated searches to a third-party listings API and keeps
//! non-empty results for 30 minutes to spare upstream calls.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod tasks;
pub mod upstream;

pub use api::AppState;
pub use config::Config;
pub use gateway::SearchGateway;
pub use tasks::spawn_rate_limit_cleanup_task;
