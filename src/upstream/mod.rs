//! Upstream Module
//!
//! Access to the third-party vehicle listings API.

mod client;

#[cfg(test)]
pub(crate) mod scripted;

pub use client::{HttpListingsClient, ListingsSource, UpstreamResponse};
