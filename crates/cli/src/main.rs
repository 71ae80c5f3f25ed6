//! Admin CLI for Folio content.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use folio_cli::client_config::{
    client_config_path, load_client_config, normalize_base_url, save_client_config,
};
use folio_cli::{ApiClient, ContentCache};
use folio_core::config::{ClientConfig, ContentSource};
use folio_core::document::catalog_label;
use folio_core::{CATALOG, DocumentName, PageDocument};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Browse and edit site content documents")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct ConnectionArgs {
    /// Client config file path
    #[arg(long, global = true, env = "FOLIO_CLIENT_CONFIG")]
    client_config: Option<String>,

    /// Server URL (overrides client config)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Read source (overrides client config)
    #[arg(long, global = true, value_enum)]
    source: Option<SourceArg>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SourceArg {
    /// The content endpoint
    Endpoint,
    /// Pre-built static files
    Static,
}

impl From<SourceArg> for ContentSource {
    fn from(source: SourceArg) -> Self {
        match source {
            SourceArg::Endpoint => ContentSource::Endpoint,
            SourceArg::Static => ContentSource::Static,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List editable documents
    List,
    /// Print a document as pretty JSON
    Get {
        name: String,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace a document with the contents of a local JSON file
    Edit {
        name: String,
        #[arg(short, long)]
        file: PathBuf,
        /// Commit message
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Create a new document from a local JSON file
    Create {
        name: String,
        #[arg(short, long)]
        file: PathBuf,
        /// Commit message
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Delete a document
    Delete { name: String },
    /// Check a document against its page schema
    Validate {
        name: String,
        /// Validate a local file instead of the remote document
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Save connection settings to the client config file
    Configure {
        /// Server URL
        url: String,
        /// Endpoint path prefix
        #[arg(long)]
        endpoint_path: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Cli {
        connection,
        command,
    } = Cli::parse();

    match command {
        Commands::List => {
            handle_list();
            Ok(())
        }
        Commands::Get { name, output } => {
            let cache = open_cache(&connection)?;
            handle_get(&cache, &name, output.as_deref()).await
        }
        Commands::Edit {
            name,
            file,
            message,
        } => {
            let content = read_json_file(&file).await?;
            let cache = open_cache(&connection)?;
            let name = DocumentName::new(name)?;
            let response = cache
                .update_content(name.as_str(), &content, message.as_deref())
                .await?;
            println!("{}", response.message);
            Ok(())
        }
        Commands::Create {
            name,
            file,
            message,
        } => {
            let name = DocumentName::conventional(name)?;
            let content = read_json_file(&file).await?;
            let cache = open_cache(&connection)?;
            let response = cache
                .create_content(name.as_str(), &content, message.as_deref())
                .await?;
            println!("{}", response.message);
            Ok(())
        }
        Commands::Delete { name } => {
            let cache = open_cache(&connection)?;
            let name = DocumentName::new(name)?;
            let response = cache.delete_content(name.as_str()).await?;
            println!("{}", response.message);
            Ok(())
        }
        Commands::Validate { name, file } => handle_validate(&connection, &name, file.as_deref()).await,
        Commands::Configure { url, endpoint_path } => {
            handle_configure(&connection, &url, endpoint_path).await
        }
    }
}

fn resolve_client_config(connection: &ConnectionArgs) -> Result<ClientConfig> {
    let path = client_config_path(connection.client_config.as_deref())?;
    let mut config = load_client_config(&path)?;
    if let Some(server) = &connection.server {
        config.base_url = normalize_base_url(server)?;
    }
    if let Some(source) = connection.source {
        config.source = source.into();
    }
    Ok(config)
}

fn open_cache(connection: &ConnectionArgs) -> Result<ContentCache> {
    let config = resolve_client_config(connection)?;
    tracing::debug!(base_url = %config.base_url, source = ?config.source, "Using client config");
    Ok(ContentCache::new(ApiClient::new(&config)?))
}

async fn read_json_file(path: &Path) -> Result<Value> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn handle_list() {
    let width = CATALOG.iter().map(|entry| entry.id.len()).max().unwrap_or(0);
    for entry in CATALOG {
        println!("{:<width$}  {}", entry.id, entry.label);
    }
}

async fn handle_get(cache: &ContentCache, name: &str, output: Option<&Path>) -> Result<()> {
    let name = DocumentName::new(name)?;
    let content = cache.get_content(name.as_str()).await;
    let rendered = serde_json::to_string_pretty(&content)?;

    match output {
        Some(path) => {
            tokio::fs::write(path, format!("{rendered}\n"))
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            let label = catalog_label(name.as_str()).unwrap_or(name.as_str());
            eprintln!("Wrote {label} ({}) to {}", name.file_name(), path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

async fn handle_validate(
    connection: &ConnectionArgs,
    name: &str,
    file: Option<&Path>,
) -> Result<()> {
    let name = DocumentName::new(name)?;
    let page = match file {
        Some(path) => PageDocument::parse(name.as_str(), read_json_file(path).await?)?,
        None => open_cache(connection)?.get_page(name.as_str()).await?,
    };

    if !PageDocument::has_schema(name.as_str()) {
        println!("{name}: no schema registered, content is valid JSON");
        return Ok(());
    }
    match page.title() {
        Some(title) => println!("{name}: valid ({title})"),
        None => println!("{name}: valid"),
    }
    Ok(())
}

async fn handle_configure(
    connection: &ConnectionArgs,
    url: &str,
    endpoint_path: Option<String>,
) -> Result<()> {
    let path = client_config_path(connection.client_config.as_deref())?;
    let mut config = load_client_config(&path)?;
    config.base_url = normalize_base_url(url)?;
    if let Some(source) = connection.source {
        config.source = source.into();
    }
    if let Some(endpoint_path) = endpoint_path {
        config.endpoint_path = endpoint_path;
    }

    save_client_config(&path, &config).await?;
    println!("Saved client config to {}", path.display());
    Ok(())
}
