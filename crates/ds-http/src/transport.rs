use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use ds_auth::config::ClientConfig;

use crate::error::{ApiError, Result};
use crate::headers::Headers;
use crate::request::{ApiRequest, ApiResponse};

/// Underlying HTTP transport
///
/// Non-2xx responses are returned as `ApiError::Http`; failures without a
/// response as `ApiError::Network` or `ApiError::Transport`.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// Transport backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    base_url: Url,
    http: Client,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = config.http_client()?;
        Ok(Self::with_client(config.base_url.clone(), http))
    }

    pub fn with_client(base_url: Url, http: Client) -> Self {
        Self { base_url, http }
    }

    /// The underlying client, for collaborators that should share its pool
    pub fn client(&self) -> &Client {
        &self.http
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self.base_url.join(&request.url)?;

        let mut builder = self.http.request(request.method.clone(), url);
        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = Headers::from(response.headers());
        let body = response.bytes().await?;
        debug!("Received {} ({} bytes)", status, body.len());

        if !status.is_success() {
            return Err(ApiError::Http {
                status,
                headers,
                body,
            });
        }

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}
