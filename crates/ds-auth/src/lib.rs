//! Credentials, token storage and token renewal for the docshare API
//!
//! This crate holds the pieces of the authentication layer that do not depend
//! on how requests are intercepted:
//!
//! - [`Credentials`]: access, refresh and ID tokens plus the account email
//! - [`TokenStore`]: get/set/clear access to the current credentials
//! - [`TokenRenewer`]: the remote renewal endpoint, exchanging a refresh token
//!   for a fresh access token
//! - [`ClientConfig`]: base URL, special paths and HTTP timeouts
//!
//! # Example
//!
//! ```no_run
//! use ds_auth::{
//!     ClientConfig, Credentials, HttpTokenRenewer, MemoryTokenStore, TokenRenewer, TokenStore,
//! };
//! use ds_auth::models::RenewalRequest;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::from_toml_str(r#"base_url = "https://api.example.com/""#)?;
//!     let store = MemoryTokenStore::with_credentials(Credentials::new("A1", "R1", "u@x.com"));
//!     let renewer = HttpTokenRenewer::new(&config)?;
//!
//!     let creds = store.get().await;
//!     let renewed = renewer
//!         .renew(&RenewalRequest {
//!             email: creds.email.clone(),
//!             refresh_token: creds.refresh_token.clone(),
//!         })
//!         .await?;
//!
//!     if let Some(token) = renewed.access_token() {
//!         store.set(creds.renewed(token.to_string(), renewed.id_token.clone())).await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Important Notes
//!
//! - Tokens must never be logged; `Credentials` redacts them in `Debug` output
//! - Persisting credentials across restarts is left to `TokenStore` implementors

pub mod config;
pub mod credentials;
pub mod errors;
pub mod models;
pub mod renewal;
pub mod store;

// Re-export main types
pub use config::{AuthPaths, ClientConfig, HttpTimeouts};
pub use credentials::Credentials;
pub use errors::{AuthError, Result};
pub use models::{RenewalRequest, RenewalResponse};
pub use renewal::{HttpTokenRenewer, TokenRenewer};
pub use store::{MemoryTokenStore, TokenStore};
