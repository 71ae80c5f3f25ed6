//! Content store abstraction and backends for Folio.
//!
//! This crate provides:
//! - The [`ContentStore`] trait: read, create, update and delete JSON blobs by path
//! - Two-phase writes ([`ContentStoreExt`]) that tie every commit to a prior read
//! - Backends: GitHub contents API and in-memory

pub mod backends;
pub mod error;
pub mod traits;
pub mod write;

pub use backends::{github::GitHubBackend, memory::MemoryBackend};
pub use error::{StoreError, StoreResult};
pub use traits::{Blob, BlobSha, ContentStore};
pub use write::{ContentStoreExt, Revision, WriteToken};

use folio_core::config::{StoreBackend, StoreConfig};
use std::sync::Arc;

/// Create a content store from configuration.
pub fn from_config(config: &StoreConfig) -> StoreResult<Arc<dyn ContentStore>> {
    match config.backend {
        StoreBackend::Github => {
            let backend = GitHubBackend::new(
                &config.api_url,
                config.owner.clone().unwrap_or_default(),
                config.repo.clone().unwrap_or_default(),
                config.branch.clone(),
                config.token.clone().unwrap_or_default(),
            )?;
            Ok(Arc::new(backend))
        }
        StoreBackend::Memory => Ok(Arc::new(MemoryBackend::new())),
    }
}
