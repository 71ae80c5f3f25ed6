//! Client-side document cache.
//!
//! One entry per document name. Concurrent readers of the same name share a
//! single in-flight fetch. Successful writes evict the written name. There is
//! no expiry and no size bound.

use crate::api_client::{ApiClient, WriteResponse};
use anyhow::Result;
use folio_core::PageDocument;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

/// Document cache in front of an [`ApiClient`].
pub struct ContentCache {
    client: ApiClient,
    entries: Mutex<HashMap<String, Arc<OnceCell<Value>>>>,
}

impl ContentCache {
    /// Empty cache reading through `client`.
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Underlying API client.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Document content, fetched at most once per name until evicted.
    ///
    /// A failed fetch is logged and cached as an empty object.
    pub async fn get_content(&self, name: &str) -> Value {
        let cell = {
            let mut entries = self.entries.lock().await;
            entries.entry(name.to_string()).or_default().clone()
        };

        cell.get_or_init(|| async {
            match self.client.fetch_document(name).await {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(name, error = %e, "Failed to load content, using empty document");
                    Value::Object(Map::new())
                }
            }
        })
        .await
        .clone()
    }

    /// Document content validated against its page schema.
    pub async fn get_page(&self, name: &str) -> folio_core::Result<PageDocument> {
        PageDocument::parse(name, self.get_content(name).await)
    }

    /// Replace a document, then evict it.
    pub async fn update_content(
        &self,
        name: &str,
        content: &Value,
        message: Option<&str>,
    ) -> Result<WriteResponse> {
        let response = self.client.update_document(name, content, message).await?;
        self.invalidate(name).await;
        Ok(response)
    }

    /// Create a document, then evict any cached placeholder for it.
    pub async fn create_content(
        &self,
        name: &str,
        content: &Value,
        message: Option<&str>,
    ) -> Result<WriteResponse> {
        let response = self.client.create_document(name, content, message).await?;
        self.invalidate(name).await;
        Ok(response)
    }

    /// Delete a document, then evict it.
    pub async fn delete_content(&self, name: &str) -> Result<WriteResponse> {
        let response = self.client.delete_document(name).await?;
        self.invalidate(name).await;
        Ok(response)
    }

    /// Drop the entry for `name`. Readers already waiting on it are unaffected.
    pub async fn invalidate(&self, name: &str) {
        if self.entries.lock().await.remove(name).is_some() {
            tracing::debug!(name, "Cache entry evicted");
        }
    }

    /// Whether `name` holds a completed value.
    pub async fn is_cached(&self, name: &str) -> bool {
        self.entries
            .lock()
            .await
            .get(name)
            .is_some_and(|cell| cell.initialized())
    }
}
