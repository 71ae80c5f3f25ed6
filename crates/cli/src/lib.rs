//! Content client, cache and admin CLI support for Folio.
//!
//! - [`ApiClient`]: typed access to the content endpoint and static documents
//! - [`ContentCache`]: per-name memoized reads with eviction on write
//! - Client configuration loading

pub mod api_client;
pub mod cache;
pub mod client_config;

pub use api_client::{ApiClient, WriteResponse};
pub use cache::ContentCache;
