use thiserror::Error;

/// Authentication and token renewal error types
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error {status}: {body_snippet}")]
    Http {
        status: reqwest::StatusCode,
        body_snippet: String,
    },

    #[error("Missing refresh token - cannot renew session")]
    MissingRefreshToken,

    #[error("Missing account email - cannot renew session")]
    MissingEmail,

    #[error("Renewal response did not contain an access token")]
    MissingAccessToken,

    #[error("Credentials changed while the renewal was in flight")]
    CredentialsChanged,

    #[error("JSON serialization/deserialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl AuthError {
    /// Build an `Http` error keeping only the head of the response body
    pub(crate) fn http(status: reqwest::StatusCode, body: &str) -> Self {
        Self::Http {
            status,
            body_snippet: body.chars().take(200).collect(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
