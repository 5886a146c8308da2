use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::errors::Result;

/// Default API paths
pub mod endpoints {
    pub const ACCOUNTS: &str = "/api/v1/accounts";
    pub const ACCOUNT_CONFIRMATION: &str = "/api/v1/accounts/confirmation";
    pub const RESEND_CONFIRMATION: &str = "/api/v1/accounts/confirmation/resend";
    pub const TOKENS: &str = "/api/v1/tokens";
    pub const TOKEN_RENEWAL: &str = "/api/v1/tokens/renewal";

    /// Paths reachable without an access token
    pub const PUBLIC: &[&str] = &[ACCOUNTS, ACCOUNT_CONFIRMATION, RESEND_CONFIRMATION, TOKENS];
}

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";
pub const DEFAULT_USER_AGENT: &str = "docshare";

/// Paths that get special treatment from the auth layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPaths {
    /// Allow-list of public paths (matched along with their sub-paths)
    pub public: Vec<String>,

    /// Token renewal path
    pub renewal: String,
}

impl Default for AuthPaths {
    fn default() -> Self {
        Self {
            public: endpoints::PUBLIC.iter().map(|p| p.to_string()).collect(),
            renewal: endpoints::TOKEN_RENEWAL.to_string(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub connect: Duration,
    pub request: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(15),
            request: Duration::from_secs(30),
        }
    }
}

/// Configuration shared by the API client and the renewal client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL that relative request paths are resolved against
    pub base_url: Url,

    pub paths: AuthPaths,

    /// HTTP client timeouts, applied to renewal and replayed calls alike
    pub http_timeouts: HttpTimeouts,

    /// Custom user agent (optional)
    pub user_agent: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            paths: AuthPaths::default(),
            http_timeouts: HttpTimeouts::default(),
            user_agent: Some(DEFAULT_USER_AGENT.to_string()),
        }
    }

    /// Parse a TOML configuration document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.into_config())
    }

    /// Load a TOML configuration file
    #[instrument(level = "debug")]
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config = Self::from_toml_str(&content)?;
        debug!("Loaded client configuration for {}", config.base_url);
        Ok(config)
    }

    /// Resolve a path or URL against the base URL
    pub fn resolve(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Build an HTTP client with the configured timeouts and user agent
    pub fn http_client(&self) -> Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .connect_timeout(self.http_timeouts.connect)
            .timeout(self.http_timeouts.request)
            .user_agent(self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))
            .build()?;
        Ok(client)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(Url::parse(DEFAULT_BASE_URL).expect("valid default base URL"))
    }
}

/// On-disk representation; everything but the base URL is optional
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    base_url: Url,
    #[serde(default)]
    user_agent: Option<String>,
    #[serde(default)]
    paths: PathsSection,
    #[serde(default)]
    timeouts: TimeoutsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PathsSection {
    public: Option<Vec<String>>,
    renewal: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TimeoutsSection {
    connect_secs: Option<u64>,
    request_secs: Option<u64>,
}

impl ConfigFile {
    fn into_config(self) -> ClientConfig {
        let defaults = ClientConfig::new(self.base_url);
        let paths = AuthPaths {
            public: self.paths.public.unwrap_or(defaults.paths.public),
            renewal: self.paths.renewal.unwrap_or(defaults.paths.renewal),
        };
        let http_timeouts = HttpTimeouts {
            connect: self
                .timeouts
                .connect_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeouts.connect),
            request: self
                .timeouts
                .request_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeouts.request),
        };

        ClientConfig {
            base_url: defaults.base_url,
            paths,
            http_timeouts,
            user_agent: self.user_agent.or(defaults.user_agent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AuthError;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config =
            ClientConfig::from_toml_str(r#"base_url = "https://api.example.com/""#).unwrap();

        assert_eq!(config.base_url.as_str(), "https://api.example.com/");
        assert_eq!(config.paths, AuthPaths::default());
        assert_eq!(config.http_timeouts, HttpTimeouts::default());
        assert_eq!(config.user_agent.as_deref(), Some(DEFAULT_USER_AGENT));
    }

    #[test]
    fn test_full_toml() {
        let config = ClientConfig::from_toml_str(
            r#"
            base_url = "https://api.example.com/"
            user_agent = "docshare-test"

            [paths]
            public = ["/auth/signup", "/auth/login"]
            renewal = "/auth/refresh"

            [timeouts]
            connect_secs = 2
            request_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.paths.public, vec!["/auth/signup", "/auth/login"]);
        assert_eq!(config.paths.renewal, "/auth/refresh");
        assert_eq!(config.http_timeouts.connect, Duration::from_secs(2));
        assert_eq!(config.http_timeouts.request, Duration::from_secs(5));
        assert_eq!(config.user_agent.as_deref(), Some("docshare-test"));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = ClientConfig::from_toml_str(
            r#"
            base_url = "https://api.example.com/"
            retries = 3
            "#,
        );
        assert!(matches!(result, Err(AuthError::Config(_))));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docshare.toml");
        tokio::fs::write(&path, "base_url = \"https://files.example.com/\"\n")
            .await
            .unwrap();

        let config = ClientConfig::load(&path).await.unwrap();
        assert_eq!(config.base_url.host_str(), Some("files.example.com"));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ClientConfig::load(&dir.path().join("missing.toml")).await;
        assert!(matches!(result, Err(AuthError::Io(_))));
    }

    #[test]
    fn test_http_client_builds_from_defaults() {
        let mut config = ClientConfig::default();
        assert!(config.http_client().is_ok());

        config.user_agent = None;
        assert!(config.http_client().is_ok());
    }

    #[test]
    fn test_resolve_relative_path() {
        let config = ClientConfig::default();
        let url = config.resolve(endpoints::TOKEN_RENEWAL).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/v1/tokens/renewal");
    }
}
