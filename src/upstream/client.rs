//! Listings API Client
//!
//! Issues a single search GET against the upstream listings provider. The
//! client reports the raw status and body; deciding what a status means is
//! left to the gateway.

use async_trait::async_trait;
use reqwest::{header, Client};
use tracing::debug;

use crate::error::{GatewayError, Result};
use crate::models::QueryDescriptor;

/// Status and body of an upstream reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// == Listings Source ==
/// Anything that can run one listings search.
#[async_trait]
pub trait ListingsSource: Send + Sync {
    /// Performs one search. Network failures are errors; non-2xx replies are not.
    async fn search(&self, api_key: &str, descriptor: &QueryDescriptor) -> Result<UpstreamResponse>;
}

// == HTTP Client ==
/// reqwest-backed listings client.
///
/// Uses reqwest's default timeout and never retries.
#[derive(Debug, Clone)]
pub struct HttpListingsClient {
    http_client: Client,
    base_url: String,
}

impl HttpListingsClient {
    /// Creates a client for the search endpoint at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
        })
    }

    /// Query parameters for one search. Always requests the first page.
    pub fn query_params(api_key: &str, descriptor: &QueryDescriptor) -> Vec<(&'static str, String)> {
        vec![
            ("api_key", api_key.to_string()),
            ("make", descriptor.make.clone()),
            ("model", descriptor.model.clone()),
            ("year", descriptor.year.clone()),
            ("zip", descriptor.location.clone()),
            ("radius", descriptor.radius.to_string()),
            ("rows", descriptor.row_count.to_string()),
            ("start", "0".to_string()),
        ]
    }
}

#[async_trait]
impl ListingsSource for HttpListingsClient {
    async fn search(&self, api_key: &str, descriptor: &QueryDescriptor) -> Result<UpstreamResponse> {
        debug!(
            make = %descriptor.make,
            model = %descriptor.model,
            year = %descriptor.year,
            zip = %descriptor.location,
            radius = descriptor.radius,
            rows = descriptor.row_count,
            "Sending upstream search request"
        );

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&Self::query_params(api_key, descriptor))
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            GatewayError::Unexpected(format!("Failed to read upstream response body: {}", e))
        })?;

        debug!(status, bytes = body.len(), "Upstream search response received");
        Ok(UpstreamResponse { status, body })
    }
}
