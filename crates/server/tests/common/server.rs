//! Server test utilities.

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use bytes::Bytes;
use folio_core::DocumentName;
use folio_core::config::AppConfig;
use folio_server::{AppState, create_router};
use folio_store::{BlobSha, ContentStore, MemoryBackend};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// A router over an in-memory store.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    pub store: Arc<MemoryBackend>,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a test server with the default test configuration.
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Create a test server with custom config modifications.
    pub fn with_config<F>(modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = AppConfig::for_testing();
        modifier(&mut config);
        let store = Arc::new(MemoryBackend::new());
        Self::with_store(config, store.clone(), store)
    }

    /// Create a test server over any store. `memory` is kept for assertions.
    pub fn with_store(
        config: AppConfig,
        store: Arc<dyn ContentStore>,
        memory: Arc<MemoryBackend>,
    ) -> Self {
        let state = AppState::new(config, store);
        let router = create_router(state.clone());
        Self {
            router,
            state,
            store: memory,
        }
    }

    /// Seed a document the way the endpoint writes it.
    pub async fn seed(&self, name: &str, content: &Value) -> BlobSha {
        let name = DocumentName::new(name).unwrap();
        let path = self.state.config.store.document_path(&name);
        let text = serde_json::to_string_pretty(content).unwrap();
        self.store.insert(&path, text).await
    }

    /// Raw stored text of a document, if present.
    pub async fn stored(&self, name: &str) -> Option<String> {
        let name = DocumentName::new(name).unwrap();
        let path = self.state.config.store.document_path(&name);
        self.store.fetch_blob(&path).await.ok().map(|blob| blob.content)
    }

    /// Send a request through the router.
    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> TestResponse {
        let body = match body {
            Some(v) => Body::from(serde_json::to_vec(&v).unwrap()),
            None => Body::empty(),
        };
        self.request_raw(method, uri, body).await
    }

    /// Send a request with an arbitrary body.
    pub async fn request_raw(&self, method: &str, uri: &str, body: Body) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(body)
            .unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Buffered response.
#[allow(dead_code)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

#[allow(dead_code)]
impl TestResponse {
    /// Body as JSON, or `Null` when empty or not JSON.
    pub fn json(&self) -> Value {
        if self.body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&self.body).unwrap_or(Value::Null)
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}
