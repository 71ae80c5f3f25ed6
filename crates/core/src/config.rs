//! Configuration types shared across crates.

use crate::document::DocumentName;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Owner value shipped in sample deployments; treated as "not configured".
pub const PLACEHOLDER_OWNER: &str = "your-username";

/// Repository value shipped in sample deployments; treated as "not configured".
pub const PLACEHOLDER_REPO: &str = "salon-website";

/// How error kinds map onto HTTP status codes.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusCodeMode {
    /// Every failure is reported as 500, as deployed clients expect.
    #[default]
    Legacy,
    /// Not-found, conflict and input failures get their own status codes.
    Semantic,
}

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Path prefix of the content endpoint.
    #[serde(default = "default_base_path")]
    pub base_path: String,
    /// Error status code mapping.
    #[serde(default)]
    pub status_codes: StatusCodeMode,
    /// Validate PUT/POST content against the page schemas.
    #[serde(default)]
    pub validate_documents: bool,
    /// Enable the /metrics endpoint for Prometheus scraping (default: true).
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_base_path() -> String {
    "/api/content".to_string()
}

fn default_metrics_enabled() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            base_path: default_base_path(),
            status_codes: StatusCodeMode::default(),
            validate_documents: false,
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

impl ServerConfig {
    /// Base path normalized to a leading slash and no trailing slash.
    pub fn normalized_base_path(&self) -> String {
        let trimmed = self.base_path.trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }
}

/// Content store backend selection.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Hosted Git repository contents API.
    #[default]
    Github,
    /// Process-local map (development and tests).
    Memory,
}

/// Content store configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend to use.
    #[serde(default)]
    pub backend: StoreBackend,
    /// Access token for the contents API. Prefer the GITHUB_TOKEN env var.
    #[serde(default)]
    pub token: Option<String>,
    /// Repository owner (user or organisation).
    #[serde(default)]
    pub owner: Option<String>,
    /// Repository name.
    #[serde(default)]
    pub repo: Option<String>,
    /// Branch holding the content.
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Base URL of the contents API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Directory of the content documents inside the repository.
    #[serde(default = "default_content_root")]
    pub content_root: String,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_content_root() -> String {
    crate::DEFAULT_CONTENT_ROOT.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            token: None,
            owner: None,
            repo: None,
            branch: default_branch(),
            api_url: default_api_url(),
            content_root: default_content_root(),
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("backend", &self.backend)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("api_url", &self.api_url)
            .field("content_root", &self.content_root)
            .finish()
    }
}

impl StoreConfig {
    /// Names of the required settings that are missing or still placeholders.
    ///
    /// Names are reported as the environment variables operators set.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        if self.backend == StoreBackend::Memory {
            return Vec::new();
        }

        let mut missing = Vec::new();
        if !is_set(self.token.as_deref(), None) {
            missing.push("GITHUB_TOKEN");
        }
        if !is_set(self.owner.as_deref(), Some(PLACEHOLDER_OWNER)) {
            missing.push("GITHUB_OWNER");
        }
        if !is_set(self.repo.as_deref(), Some(PLACEHOLDER_REPO)) {
            missing.push("GITHUB_REPO");
        }
        missing
    }

    /// Whether every required setting is present.
    pub fn is_configured(&self) -> bool {
        self.missing_settings().is_empty()
    }

    /// Repository path of a document's blob.
    pub fn document_path(&self, name: &DocumentName) -> String {
        name.path_in(&self.content_root)
    }
}

fn is_set(value: Option<&str>, placeholder: Option<&str>) -> bool {
    match value.map(str::trim) {
        None | Some("") => false,
        Some(value) => placeholder != Some(value),
    }
}

/// Complete server-side configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Content store configuration.
    #[serde(default)]
    pub store: StoreConfig,
}

impl AppConfig {
    /// Create a test configuration backed by the in-memory store.
    ///
    /// **For testing only.**
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig::default(),
            store: StoreConfig {
                backend: StoreBackend::Memory,
                ..StoreConfig::default()
            },
        }
    }

    /// Layered configuration sources.
    ///
    /// Later sources win: the TOML file (if it exists), the host's
    /// `GITHUB_*` variables, then `FOLIO_*` variables split on `__`.
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new();

        if let Some(path) = config_path.filter(|path| path.exists()) {
            figment = figment.merge(Toml::file(path));
        }

        figment
            .merge(
                Env::prefixed("GITHUB_")
                    .only(&["token", "owner", "repo", "branch"])
                    .map(|key| format!("store.{key}").into()),
            )
            .merge(
                Env::prefixed("FOLIO_")
                    .ignore(&["config", "client_config"])
                    .split("__"),
            )
    }

    /// Load configuration from all sources.
    pub fn load(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        Self::figment(config_path).extract()
    }
}

/// Where the admin client reads documents from.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    /// The content endpoint (reads the backing store).
    #[default]
    Endpoint,
    /// Pre-built static files at `assets/data/{name}.json`.
    Static,
}

/// Admin client configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the site or endpoint server.
    #[serde(default = "default_client_base_url")]
    pub base_url: String,
    /// Read source for documents. Writes always go through the endpoint.
    #[serde(default)]
    pub source: ContentSource,
    /// Path prefix of the content endpoint.
    #[serde(default = "default_base_path")]
    pub endpoint_path: String,
}

fn default_client_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_client_base_url(),
            source: ContentSource::default(),
            endpoint_path: default_base_path(),
        }
    }
}
