//! Two-phase writes.
//!
//! Every mutation first resolves the blob's current state and then commits
//! against it. The tokens returned by the `begin_*` calls are the only way to
//! reach `commit_*`, so a write cannot skip the read.

use crate::error::{StoreError, StoreResult};
use crate::traits::{BlobSha, ContentStore};
use async_trait::async_trait;

/// Current revision of an existing blob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Revision {
    path: String,
    sha: BlobSha,
}

impl Revision {
    /// Repository path of the blob.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Hash the commit will be checked against.
    pub fn sha(&self) -> &BlobSha {
        &self.sha
    }
}

/// Permission to write a blob, obtained from [`ContentStoreExt::begin_create`]
/// or [`ContentStoreExt::begin_update`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteToken {
    /// The blob was absent when checked.
    Create { path: String },
    /// The blob existed at this revision.
    Update(Revision),
}

impl WriteToken {
    /// Repository path of the blob.
    pub fn path(&self) -> &str {
        match self {
            Self::Create { path } => path,
            Self::Update(revision) => revision.path(),
        }
    }

    /// Hash sent with the commit, if any.
    pub fn expected_sha(&self) -> Option<&BlobSha> {
        match self {
            Self::Create { .. } => None,
            Self::Update(revision) => Some(revision.sha()),
        }
    }
}

impl From<Revision> for WriteToken {
    fn from(revision: Revision) -> Self {
        Self::Update(revision)
    }
}

/// Two-phase write operations for every [`ContentStore`].
///
/// Automatically implemented for all stores; do not implement manually.
#[async_trait]
pub trait ContentStoreExt: ContentStore {
    /// Confirm a blob is absent before creating it.
    ///
    /// Only a successful read counts as "exists"; any failed read is treated as
    /// absent and left for the commit to surface.
    async fn begin_create(&self, path: &str) -> StoreResult<WriteToken> {
        match self.fetch_sha(path).await {
            Ok(sha) => {
                tracing::debug!(path, sha = %sha, "Blob already exists");
                Err(StoreError::AlreadyExists(path.to_string()))
            }
            Err(e) => {
                if !e.is_not_found() {
                    tracing::debug!(path, error = %e, "Existence check failed, treating blob as absent");
                }
                Ok(WriteToken::Create {
                    path: path.to_string(),
                })
            }
        }
    }

    /// Resolve the current revision of a blob before replacing or deleting it.
    async fn begin_update(&self, path: &str) -> StoreResult<Revision> {
        let sha = self.fetch_sha(path).await?;
        tracing::debug!(path, sha = %sha, "Resolved current revision");
        Ok(Revision {
            path: path.to_string(),
            sha,
        })
    }

    /// Write `content` under a token from `begin_create` or `begin_update`.
    async fn commit_write(
        &self,
        token: WriteToken,
        content: &[u8],
        message: &str,
    ) -> StoreResult<BlobSha> {
        self.put_blob(token.path(), content, token.expected_sha(), message)
            .await
    }

    /// Delete the blob at the resolved revision.
    async fn commit_delete(&self, revision: Revision, message: &str) -> StoreResult<()> {
        self.delete_blob(revision.path(), revision.sha(), message)
            .await
    }
}

impl<T: ContentStore + ?Sized> ContentStoreExt for T {}
