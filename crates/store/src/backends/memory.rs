//! In-memory content store.
//!
//! Follows the contents API rules: hashes change on every write, stale hashes
//! are rejected, creates over an existing blob are rejected. Every successful
//! write is recorded as a commit.

use crate::error::{StoreError, StoreResult};
use crate::traits::{Blob, BlobSha, ContentStore};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Kind of change recorded by a commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitKind {
    Create,
    Update,
    Delete,
}

/// A successful write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    pub kind: CommitKind,
    pub path: String,
    pub message: String,
}

#[derive(Default)]
struct Inner {
    blobs: HashMap<String, (String, BlobSha)>,
    commits: Vec<Commit>,
}

/// Process-local content store.
#[derive(Default)]
pub struct MemoryBackend {
    inner: Mutex<Inner>,
}

impl MemoryBackend {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a blob without recording a commit. Returns its hash.
    pub async fn insert(&self, path: &str, content: impl Into<String>) -> BlobSha {
        let content = content.into();
        let sha = blob_sha(content.as_bytes());
        self.inner
            .lock()
            .await
            .blobs
            .insert(path.to_string(), (content, sha.clone()));
        sha
    }

    /// Commits recorded so far, oldest first.
    pub async fn commits(&self) -> Vec<Commit> {
        self.inner.lock().await.commits.clone()
    }

    /// Number of stored blobs.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.blobs.len()
    }

    /// Whether the store holds no blobs.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.blobs.is_empty()
    }
}

/// Git-style blob hash (`blob <len>\0<content>`), using SHA-256.
pub fn blob_sha(content: &[u8]) -> BlobSha {
    let mut hasher = Sha256::new();
    hasher.update(format!("blob {}\0", content.len()).as_bytes());
    hasher.update(content);
    BlobSha::new(hex::encode(hasher.finalize()))
}

fn not_found(path: &str) -> StoreError {
    StoreError::NotFound {
        path: path.to_string(),
        reason: "Not Found".to_string(),
    }
}

fn stale(path: &str, sha: &BlobSha) -> StoreError {
    StoreError::Conflict {
        status: 409,
        reason: format!("{path} does not match {sha}"),
    }
}

#[async_trait]
impl ContentStore for MemoryBackend {
    async fn fetch_blob(&self, path: &str) -> StoreResult<Blob> {
        let inner = self.inner.lock().await;
        let (content, sha) = inner.blobs.get(path).ok_or_else(|| not_found(path))?;
        Ok(Blob {
            content: content.clone(),
            sha: sha.clone(),
        })
    }

    async fn put_blob(
        &self,
        path: &str,
        content: &[u8],
        sha: Option<&BlobSha>,
        message: &str,
    ) -> StoreResult<BlobSha> {
        let text = String::from_utf8(content.to_vec())
            .map_err(|e| StoreError::Decode(format!("content is not UTF-8: {e}")))?;

        let mut inner = self.inner.lock().await;
        let kind = match (inner.blobs.get(path), sha) {
            (None, None) => CommitKind::Create,
            (None, Some(_)) => return Err(not_found(path)),
            (Some(_), None) => {
                return Err(StoreError::Conflict {
                    status: 422,
                    reason: "Invalid request.\n\n\"sha\" wasn't supplied.".to_string(),
                });
            }
            (Some((_, current)), Some(expected)) if current != expected => {
                return Err(stale(path, expected));
            }
            (Some(_), Some(_)) => CommitKind::Update,
        };

        let new_sha = blob_sha(content);
        inner
            .blobs
            .insert(path.to_string(), (text, new_sha.clone()));
        inner.commits.push(Commit {
            kind,
            path: path.to_string(),
            message: message.to_string(),
        });
        tracing::debug!(path, sha = %new_sha, ?kind, "Blob written");
        Ok(new_sha)
    }

    async fn delete_blob(&self, path: &str, sha: &BlobSha, message: &str) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        match inner.blobs.get(path) {
            None => return Err(not_found(path)),
            Some((_, current)) if current != sha => return Err(stale(path, sha)),
            Some(_) => {}
        }

        inner.blobs.remove(path);
        inner.commits.push(Commit {
            kind: CommitKind::Delete,
            path: path.to_string(),
            message: message.to_string(),
        });
        tracing::debug!(path, "Blob deleted");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
