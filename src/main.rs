use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use ds_auth::{ClientConfig, Credentials, MemoryTokenStore};
use ds_http::{ApiClient, ApiRequest, AuthEvent};
use reqwest::Method;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Issue an authenticated request against the docshare API
#[derive(Debug, Parser)]
#[command(name = "docshare", version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Overrides the configured base URL
    #[arg(long)]
    base_url: Option<Url>,

    #[arg(long, env = "DOCSHARE_ACCESS_TOKEN", default_value = "", hide_env_values = true)]
    access_token: String,

    #[arg(long, env = "DOCSHARE_REFRESH_TOKEN", default_value = "", hide_env_values = true)]
    refresh_token: String,

    #[arg(long, env = "DOCSHARE_EMAIL", default_value = "")]
    email: String,

    /// HTTP method
    #[arg(value_parser = parse_method)]
    method: Method,

    /// Path or absolute URL
    path: String,

    /// JSON request body
    #[arg(long, short)]
    data: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ClientConfig::load(path)
            .await
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ClientConfig::default(),
    };
    if let Some(base_url) = cli.base_url.clone() {
        config.base_url = base_url;
    }

    let store = Arc::new(MemoryTokenStore::with_credentials(Credentials::new(
        cli.access_token.clone(),
        cli.refresh_token.clone(),
        cli.email.clone(),
    )));
    let client = ApiClient::new(&config, store).context("Failed to build API client")?;
    let mut events = client.subscribe();

    let mut request = ApiRequest::new(cli.method.clone(), cli.path.clone());
    if let Some(data) = &cli.data {
        let body: serde_json::Value =
            serde_json::from_str(data).context("Request body is not valid JSON")?;
        request = request.json(&body)?;
    }

    info!("{} {}", cli.method, config.base_url.join(&cli.path)?);
    let outcome = client.send(request).await;

    while let Ok(event) = events.try_recv() {
        match event {
            AuthEvent::TokenRenewed => info!("Access token was renewed during the request"),
            AuthEvent::SessionExpired { reason } => {
                warn!("Session expired ({}); sign in again", reason)
            }
        }
    }

    match outcome {
        Ok(response) => {
            println!("{}", response.text());
            Ok(())
        }
        Err(e) => {
            if let Some(body) = e.body().filter(|b| !b.is_empty()) {
                eprintln!("{}", String::from_utf8_lossy(body));
            }
            Err(e).context("Request failed")
        }
    }
}

fn parse_method(s: &str) -> Result<Method, String> {
    Method::from_bytes(s.to_ascii_uppercase().as_bytes()).map_err(|e| e.to_string())
}
