//! Content store trait definitions.

use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Content hash issued by the store for a blob revision.
///
/// Opaque to callers. It changes on every write and must be echoed back to
/// update or delete the blob.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobSha(String);

impl BlobSha {
    /// Wrap a store-issued hash.
    pub fn new(sha: impl Into<String>) -> Self {
        Self(sha.into())
    }

    /// Get the hash string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BlobSha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlobSha({})", self.0)
    }
}

impl fmt::Display for BlobSha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A blob read from the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    /// Decoded UTF-8 content.
    pub content: String,
    /// Hash of this revision.
    pub sha: BlobSha,
}

impl Blob {
    /// Parse the content as JSON.
    pub fn json(&self) -> StoreResult<serde_json::Value> {
        serde_json::from_str(&self.content)
            .map_err(|e| StoreError::Decode(format!("blob is not valid JSON: {e}")))
    }
}

/// Versioned blob store addressed by repository path.
///
/// Writes carry optimistic-concurrency hashes: updates and deletes must name the
/// current [`BlobSha`], creates must name none. Implementations do not retry.
#[async_trait]
pub trait ContentStore: Send + Sync + 'static {
    /// Read a blob and its current hash.
    async fn fetch_blob(&self, path: &str) -> StoreResult<Blob>;

    /// Read only the current hash of a blob.
    async fn fetch_sha(&self, path: &str) -> StoreResult<BlobSha> {
        Ok(self.fetch_blob(path).await?.sha)
    }

    /// Create (`sha = None`) or replace (`sha = Some(current)`) a blob.
    ///
    /// Returns the hash of the new revision.
    async fn put_blob(
        &self,
        path: &str,
        content: &[u8],
        sha: Option<&BlobSha>,
        message: &str,
    ) -> StoreResult<BlobSha>;

    /// Delete a blob at its current hash.
    async fn delete_blob(&self, path: &str, sha: &BlobSha, message: &str) -> StoreResult<()>;

    /// Get the name of this store backend.
    ///
    /// Used for metrics and logging.
    fn backend_name(&self) -> &'static str;
}
