use anyhow::{Context, Result};
use folio_core::config::{ClientConfig, ContentSource};
use reqwest::Url;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// Path of the pre-built static documents below the site root.
pub const STATIC_DATA_PATH: &str = "assets/data";

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    endpoint_path: String,
    source: ContentSource,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).context("invalid server URL")?;
        let endpoint_path = config.endpoint_path.trim_matches('/').to_string();
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            endpoint_path,
            source: config.source,
        })
    }

    pub fn source(&self) -> ContentSource {
        self.source
    }

    /// Append relative path segments to the base URL, keeping any path prefix
    /// the site is served under (`https://host/salon/`).
    fn url<'a>(&self, parts: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("server URL must be an http(s) URL with a path"))?
            .pop_if_empty()
            .extend(
                parts
                    .into_iter()
                    .flat_map(|part| part.split('/'))
                    .filter(|segment| !segment.is_empty()),
            );
        Ok(url)
    }

    /// Endpoint URL of a document (or of the collection for `None`).
    pub fn endpoint_url(&self, name: Option<&str>) -> Result<Url> {
        self.url([self.endpoint_path.as_str(), name.unwrap_or_default()])
    }

    /// URL of a pre-built static document.
    pub fn static_url(&self, name: &str) -> Result<Url> {
        let file = format!("{name}.json");
        self.url([STATIC_DATA_PATH, file.as_str()])
    }

    async fn send_json<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> Result<T> {
        let response = req.send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            anyhow::bail!("API error ({}): {}", status, error_message(&body));
        }
        serde_json::from_str(&body).context("unexpected response body")
    }

    /// Read a document from the configured source.
    pub async fn fetch_document(&self, name: &str) -> Result<Value> {
        let url = match self.source {
            ContentSource::Endpoint => self.endpoint_url(Some(name))?,
            ContentSource::Static => self.static_url(name)?,
        };
        tracing::debug!(url = %url, "Fetching document");
        self.send_json(self.http.get(url)).await
    }

    pub async fn update_document(
        &self,
        name: &str,
        content: &Value,
        message: Option<&str>,
    ) -> Result<WriteResponse> {
        let url = self.endpoint_url(Some(name))?;
        let req = UpdateDocumentRequest { content, message };
        self.send_json(self.http.put(url).json(&req)).await
    }

    pub async fn create_document(
        &self,
        name: &str,
        content: &Value,
        message: Option<&str>,
    ) -> Result<WriteResponse> {
        let url = self.endpoint_url(None)?;
        let req = CreateDocumentRequest {
            filename: name,
            content,
            message,
        };
        self.send_json(self.http.post(url).json(&req)).await
    }

    pub async fn delete_document(&self, name: &str) -> Result<WriteResponse> {
        let url = self.endpoint_url(Some(name))?;
        self.send_json(self.http.delete(url)).await
    }
}

/// Prefer the endpoint's `error` field over the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

#[derive(Debug, Serialize)]
pub struct UpdateDocumentRequest<'a> {
    pub content: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct CreateDocumentRequest<'a> {
    pub filename: &'a str,
    pub content: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct WriteResponse {
    pub success: bool,
    pub message: String,
}
