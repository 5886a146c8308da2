use serde::{Deserialize, Serialize};

/// Body of the token renewal request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RenewalRequest {
    pub email: String,
    pub refresh_token: String,
}

/// Token renewal response
///
/// The access token is optional on the wire; a response without one is
/// treated as a failed renewal by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RenewalResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
}

impl RenewalResponse {
    /// Return the access token if it is present and non-empty
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }
}
