//! Cache Key Module
//!
//! Derives the cache key for a search from its identifying fields.

use serde_json::json;

use crate::models::QueryDescriptor;

// == Cache Key ==
/// Builds the cache key for a descriptor.
///
/// The key is a JSON array of `[make, model, year, location, radius]`, in
/// that order. JSON string escaping keeps field boundaries unambiguous, so
/// two descriptors share a key only when all five fields match. Row count
/// is deliberately left out.
pub fn cache_key(descriptor: &QueryDescriptor) -> String {
    json!([
        descriptor.make,
        descriptor.model,
        descriptor.year,
        descriptor.location,
        descriptor.radius,
    ])
    .to_string()
}
