//! Cache Module
//!
//! Provides the time-bounded lookaside cache for upstream search results.

mod clock;
mod entry;
mod key;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use key::cache_key;
pub use stats::CacheStats;
pub use store::ListingCache;

// == Public Constants ==
/// Lifetime of a cached search result in milliseconds (30 minutes)
pub const CACHE_TTL_MS: u64 = 30 * 60 * 1000;
