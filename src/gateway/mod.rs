//! Gateway Module
//!
//! The cache-aside search path between the HTTP layer and the listings API.

mod service;


pub use service::SearchGateway;
