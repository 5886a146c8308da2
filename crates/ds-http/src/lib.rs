//! Authenticated HTTP client for the docshare API
//!
//! Requests run through an explicit [`Pipeline`]:
//!
//! 1. [`RequestAuthenticator`] attaches `Authorization: Bearer <token>` to
//!    requests on protected paths
//! 2. the [`Transport`] sends the request
//! 3. [`ResponseAuthHandler`] turns a 401 on a protected, not yet retried
//!    request into a token refresh followed by one replay
//!
//! The [`RefreshCoordinator`] guarantees that at most one renewal call is in
//! flight: requests that fail while a renewal is running wait for its outcome
//! instead of starting their own. If the renewal fails, every waiting caller
//! gets its own original 401 back and the token store is cleared.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ds_auth::{ClientConfig, Credentials, MemoryTokenStore};
//! use ds_http::{ApiClient, AuthEvent};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::from_toml_str(r#"base_url = "https://api.example.com/""#)?;
//!     let store = Arc::new(MemoryTokenStore::new());
//!     let client = ApiClient::new(&config, store)?;
//!
//!     client.sign_in_with(Credentials::new("A1", "R1", "u@x.com")).await?;
//!
//!     let mut events = client.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             if let AuthEvent::SessionExpired { .. } = event {
//!                 println!("session expired, please sign in again");
//!             }
//!         }
//!     });
//!
//!     let contacts = client.get("/api/v1/contacts").await?;
//!     println!("{}", contacts.text());
//!     Ok(())
//! }
//! ```

pub mod authenticator;
pub mod client;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod headers;
pub mod middleware;
pub mod paths;
pub mod request;
pub mod response_handler;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use authenticator::RequestAuthenticator;
pub use client::ApiClient;
pub use coordinator::RefreshCoordinator;
pub use error::{ApiError, Result};
pub use events::AuthEvent;
pub use headers::Headers;
pub use middleware::{Dispatch, Pipeline, RequestHook, ResponseHook};
pub use paths::{PathClass, PathClassifier};
pub use request::{ApiRequest, ApiResponse};
pub use response_handler::ResponseAuthHandler;
pub use transport::{ReqwestTransport, Transport};
