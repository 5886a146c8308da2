use serde::{Deserialize, Serialize};

/// Credential set for the signed-in account
///
/// Empty strings stand for absent values. An empty `access_token` means the
/// client is unauthenticated; an empty `refresh_token` or `email` means the
/// session cannot be renewed.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: String,
    pub id_token: String,
    pub email: String,
}

impl Credentials {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            id_token: String::new(),
            email: email.into(),
        }
    }

    pub fn with_id_token(mut self, id_token: impl Into<String>) -> Self {
        self.id_token = id_token.into();
        self
    }

    /// Check whether an access token is available
    pub fn is_authenticated(&self) -> bool {
        !self.access_token.is_empty()
    }

    /// Check whether a renewal call can be made with these credentials
    pub fn can_renew(&self) -> bool {
        !self.refresh_token.is_empty() && !self.email.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Produce the credential set after a successful renewal
    ///
    /// The refresh token and email are kept; the ID token is only replaced
    /// when the renewal returned one.
    pub fn renewed(&self, access_token: String, id_token: Option<String>) -> Self {
        Self {
            access_token,
            refresh_token: self.refresh_token.clone(),
            id_token: id_token.unwrap_or_else(|| self.id_token.clone()),
            email: self.email.clone(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn redact(value: &str) -> &'static str {
            if value.is_empty() { "<empty>" } else { "<redacted>" }
        }

        f.debug_struct("Credentials")
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("id_token", &redact(&self.id_token))
            .field("email", &self.email)
            .finish()
    }
}
