use bytes::Bytes;
use reqwest::StatusCode;
use thiserror::Error;

use crate::headers::Headers;

/// Errors surfaced by the API client
///
/// `Http` is returned unmodified to callers so they can inspect the status
/// and the full body.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request never produced a response (custom transports)
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP error {status}: {}", snippet(.body))]
    Http {
        status: StatusCode,
        headers: Headers,
        body: Bytes,
    },

    /// Building the HTTP or renewal client failed
    #[error("Authentication setup error: {0}")]
    Auth(#[from] ds_auth::AuthError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON serialization/deserialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&Bytes> {
        match self {
            Self::Http { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Check whether the server answered at all
    pub fn has_response(&self) -> bool {
        matches!(self, Self::Http { .. })
    }

    /// 401: the access token is no longer valid
    pub fn is_auth_expiry(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// 403: authenticated but not permitted
    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(StatusCode::FORBIDDEN)
    }
}

fn snippet(body: &Bytes) -> String {
    String::from_utf8_lossy(body).chars().take(200).collect()
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn http_error(status: StatusCode, body: &'static str) -> ApiError {
        ApiError::Http {
            status,
            headers: Headers::new(),
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[test]
    fn test_status_classification() {
        let expired = http_error(StatusCode::UNAUTHORIZED, "expired");
        assert!(expired.is_auth_expiry());
        assert!(!expired.is_forbidden());
        assert!(expired.has_response());

        let forbidden = http_error(StatusCode::FORBIDDEN, "nope");
        assert!(forbidden.is_forbidden());
        assert!(!forbidden.is_auth_expiry());

        let offline = ApiError::Transport("connection refused".to_string());
        assert!(!offline.has_response());
        assert!(!offline.is_auth_expiry());
        assert_eq!(offline.status(), None);
    }

    #[test]
    fn test_display_truncates_body_but_keeps_it() {
        let long = "e".repeat(1000);
        let err = ApiError::Http {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            headers: Headers::new(),
            body: Bytes::from(long.clone()),
        };

        assert!(err.to_string().len() < 300);
        assert_eq!(err.body().map(|b| b.len()), Some(1000));
    }
}
