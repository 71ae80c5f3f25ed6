//! Client configuration file handling.

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use folio_core::config::ClientConfig;
use std::path::{Path, PathBuf};

/// Resolve the client config path: the explicit `--client-config` value (clap
/// fills it from `FOLIO_CLIENT_CONFIG`), then `$XDG_CONFIG_HOME/folio/client.toml`
/// (or `~/.config/folio/client.toml`).
pub fn client_config_path(explicit: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(PathBuf::from(path));
    }

    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(path) => PathBuf::from(path),
        None => {
            let home = std::env::var_os("HOME")
                .ok_or_else(|| anyhow::anyhow!("HOME not set; pass --client-config"))?;
            PathBuf::from(home).join(".config")
        }
    };

    Ok(base.join("folio").join("client.toml"))
}

/// Load the client config; a missing file yields defaults.
///
/// `FOLIO_CLIENT_*` variables (e.g. `FOLIO_CLIENT_BASE_URL`) override the file.
pub fn load_client_config(path: &Path) -> Result<ClientConfig> {
    let mut figment = Figment::new();

    if path.exists() {
        figment = figment.merge(Toml::file(path));
    }

    figment = figment.merge(Env::prefixed("FOLIO_CLIENT_").ignore(&["config"]));

    figment
        .extract()
        .with_context(|| format!("failed to load client configuration from {}", path.display()))
}

pub async fn save_client_config(path: &Path, config: &ClientConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let contents = toml::to_string_pretty(config)?;
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

pub fn normalize_base_url(url: &str) -> Result<String> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("server URL must start with http:// or https://");
    }
    Ok(url.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use folio_core::config::ContentSource;

    #[test]
    fn normalize_base_url_requires_scheme() {
        assert!(normalize_base_url("salon.example.com").is_err());
        assert_eq!(
            normalize_base_url("https://salon.example.com/").unwrap(),
            "https://salon.example.com"
        );
    }

    #[test]
    fn missing_file_gives_defaults() {
        Jail::expect_with(|jail| {
            let config = load_client_config(&jail.directory().join("absent.toml")).unwrap();
            assert_eq!(config, ClientConfig::default());
            Ok(())
        });
    }

    #[test]
    fn file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "client.toml",
                r#"
                base_url = "https://salon.example.com"
                source = "static"
                "#,
            )?;
            jail.set_env("FOLIO_CLIENT_ENDPOINT_PATH", "/.netlify/functions/content-api");

            let config = load_client_config(&jail.directory().join("client.toml")).unwrap();
            assert_eq!(config.base_url, "https://salon.example.com");
            assert_eq!(config.source, ContentSource::Static);
            assert_eq!(config.endpoint_path, "/.netlify/functions/content-api");
            Ok(())
        });
    }

    #[test]
    fn default_path_uses_xdg_config_home() {
        Jail::expect_with(|jail| {
            jail.set_env("XDG_CONFIG_HOME", "/tmp/xdg");
            jail.set_env("FOLIO_CLIENT_CONFIG", "/tmp/ignored.toml");
            let path = client_config_path(None).unwrap();
            assert_eq!(path, PathBuf::from("/tmp/xdg/folio/client.toml"));
            Ok(())
        });
    }

    #[test]
    fn explicit_path_wins() {
        let path = client_config_path(Some("/tmp/folio.toml")).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/folio.toml"));
    }
}
