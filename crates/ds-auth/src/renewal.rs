use reqwest::Client;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::errors::{AuthError, Result};
use crate::models::{RenewalRequest, RenewalResponse};

/// Remote collaborator that exchanges a refresh token for a new access token
#[async_trait::async_trait]
pub trait TokenRenewer: Send + Sync {
    async fn renew(&self, request: &RenewalRequest) -> Result<RenewalResponse>;
}

/// Renewal client calling the renewal endpoint over HTTP
#[derive(Debug, Clone)]
pub struct HttpTokenRenewer {
    url: Url,
    http: Client,
}

impl HttpTokenRenewer {
    /// Create a renewal client with its own HTTP client
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Self::with_client(config, config.http_client()?)
    }

    /// Create a renewal client sharing an existing HTTP client
    pub fn with_client(config: &ClientConfig, http: Client) -> Result<Self> {
        let url = config.resolve(&config.paths.renewal)?;
        Ok(Self { url, http })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait::async_trait]
impl TokenRenewer for HttpTokenRenewer {
    #[instrument(skip(self, request), fields(url = %self.url))]
    async fn renew(&self, request: &RenewalRequest) -> Result<RenewalResponse> {
        debug!("Requesting access token renewal");
        let response = self
            .http
            .post(self.url.clone())
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Token renewal rejected with status {}", status);
            return Err(AuthError::http(status, &body));
        }

        let body = response.bytes().await?;
        let renewal: RenewalResponse = serde_json::from_slice(&body)?;
        Ok(renewal)
    }
}
