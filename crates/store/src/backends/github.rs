//! Hosted Git repository backend using the GitHub contents API.
//!
//! Wire contract: `GET/PUT/DELETE /repos/{owner}/{repo}/contents/{path}`, with
//! base64 blob content and the blob `sha` as the concurrency token.

use crate::error::{StoreError, StoreResult};
use crate::traits::{Blob, BlobSha, ContentStore};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::instrument;

/// Media type requested from the contents API.
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    #[serde(default)]
    content: Option<String>,
    sha: String,
}

#[derive(Debug, Deserialize)]
struct WriteResponse {
    content: WrittenContent,
}

#[derive(Debug, Deserialize)]
struct WrittenContent {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct PutRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    branch: &'a str,
}

#[derive(Debug, Serialize)]
struct DeleteRequest<'a> {
    message: &'a str,
    sha: &'a str,
    branch: &'a str,
}

/// Content store backed by one branch of one GitHub repository.
pub struct GitHubBackend {
    http: reqwest::Client,
    api_url: Url,
    owner: String,
    repo: String,
    branch: String,
    token: String,
}

impl GitHubBackend {
    /// Create a new backend.
    ///
    /// Missing credentials are not an error here; callers check configuration
    /// before issuing requests.
    pub fn new(
        api_url: &str,
        owner: impl Into<String>,
        repo: impl Into<String>,
        branch: impl Into<String>,
        token: impl Into<String>,
    ) -> StoreResult<Self> {
        let api_url = Url::parse(api_url)
            .map_err(|e| StoreError::Config(format!("invalid api_url '{api_url}': {e}")))?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_url,
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
            token: token.into(),
        })
    }

    /// Branch the backend reads and writes.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Contents URL of `path`. Each path segment is percent-encoded on its own,
    /// so a segment can never climb out of `/repos/{owner}/{repo}/contents/`.
    fn contents_url(&self, path: &str) -> StoreResult<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Config("api_url must be an http(s) URL with a path".to_string()))?
            .pop_if_empty()
            .extend(["repos", self.owner.as_str(), self.repo.as_str(), "contents"])
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }

    fn headers(&self) -> StoreResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("token {}", self.token))
            .map_err(|_| StoreError::Config("token contains invalid characters".to_string()))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));
        Ok(headers)
    }

    async fn get_contents(&self, path: &str) -> StoreResult<ContentsResponse> {
        let mut url = self.contents_url(path)?;
        url.query_pairs_mut().append_pair("ref", &self.branch);

        let response = self.http.get(url).headers(self.headers()?).send().await?;
        if !response.status().is_success() {
            return Err(error_from_response(path, response, false).await);
        }
        response
            .json::<ContentsResponse>()
            .await
            .map_err(|e| StoreError::Decode(format!("unexpected contents response: {e}")))
    }
}

impl fmt::Debug for GitHubBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubBackend")
            .field("api_url", &self.api_url.as_str())
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Status text for a response, as browsers report it.
fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Unknown Status")
        .to_string()
}

/// Classify a non-success response.
///
/// Reads report the status text only; writes prefer the `message` field of the
/// store's JSON error body.
async fn error_from_response(path: &str, response: Response, prefer_body: bool) -> StoreError {
    let status = response.status();
    let mut reason = status_text(status);

    if prefer_body {
        match response.json::<ErrorBody>().await {
            Ok(ErrorBody {
                message: Some(message),
            }) if !message.is_empty() => reason = message,
            Ok(_) => {}
            Err(e) => tracing::debug!(path, error = %e, "Store error body was not JSON"),
        }
    }

    tracing::warn!(path, status = status.as_u16(), reason = %reason, "Contents API request failed");

    match status {
        StatusCode::NOT_FOUND => StoreError::NotFound {
            path: path.to_string(),
            reason,
        },
        StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => StoreError::Conflict {
            status: status.as_u16(),
            reason,
        },
        _ => StoreError::Rejected {
            status: status.as_u16(),
            reason,
        },
    }
}

/// Decode the base64 payload of the contents API (wrapped at 60 columns).
fn decode_content(encoded: &str) -> StoreResult<String> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| StoreError::Decode(format!("invalid base64 content: {e}")))?;
    String::from_utf8(bytes).map_err(|e| StoreError::Decode(format!("content is not UTF-8: {e}")))
}

#[async_trait]
impl ContentStore for GitHubBackend {
    #[instrument(skip(self), fields(backend = "github"))]
    async fn fetch_blob(&self, path: &str) -> StoreResult<Blob> {
        let contents = self.get_contents(path).await?;
        let encoded = contents
            .content
            .ok_or_else(|| StoreError::Decode(format!("{path} has no inline content")))?;
        Ok(Blob {
            content: decode_content(&encoded)?,
            sha: BlobSha::new(contents.sha),
        })
    }

    #[instrument(skip(self), fields(backend = "github"))]
    async fn fetch_sha(&self, path: &str) -> StoreResult<BlobSha> {
        let contents = self.get_contents(path).await?;
        Ok(BlobSha::new(contents.sha))
    }

    #[instrument(skip(self, content), fields(backend = "github", bytes = content.len()))]
    async fn put_blob(
        &self,
        path: &str,
        content: &[u8],
        sha: Option<&BlobSha>,
        message: &str,
    ) -> StoreResult<BlobSha> {
        let url = self.contents_url(path)?;
        let body = PutRequest {
            message,
            content: general_purpose::STANDARD.encode(content),
            sha: sha.map(BlobSha::as_str),
            branch: &self.branch,
        };

        let response = self
            .http
            .put(url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response(path, response, true).await);
        }

        let written = response
            .json::<WriteResponse>()
            .await
            .map_err(|e| StoreError::Decode(format!("unexpected write response: {e}")))?;
        Ok(BlobSha::new(written.content.sha))
    }

    #[instrument(skip(self), fields(backend = "github"))]
    async fn delete_blob(&self, path: &str, sha: &BlobSha, message: &str) -> StoreResult<()> {
        let url = self.contents_url(path)?;
        let body = DeleteRequest {
            message,
            sha: sha.as_str(),
            branch: &self.branch,
        };

        let response = self
            .http
            .delete(url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response(path, response, true).await);
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "github"
    }
}
