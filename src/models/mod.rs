//! Request and Response models for the search proxy API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! deserializing inbound queries and serializing response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{QueryDescriptor, SearchQuery, DEFAULT_RADIUS, DEFAULT_ROW_COUNT};
pub use responses::{empty_results, HealthResponse, StatsResponse};
