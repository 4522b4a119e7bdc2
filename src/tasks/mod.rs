//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Rate limit pruning: drops closed per-client windows at configured intervals
//!
//! The listing cache has no sweeper; its entries expire on read.

mod cleanup;

pub use cleanup::spawn_rate_limit_cleanup_task;
