use std::sync::{Arc, RwLock};

use crate::credentials::Credentials;
use crate::errors::{AuthError, Result};

/// Trait for holding the current credential set
///
/// Implementations must replace the whole value on `set` and `clear` so a
/// reader never observes a half-written credential set.
#[async_trait::async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the current credentials (empty when signed out)
    async fn get(&self) -> Credentials;

    /// Replace the current credentials
    async fn set(&self, credentials: Credentials) -> Result<()>;

    /// Drop all credentials, forcing re-authentication
    async fn clear(&self) -> Result<()>;
}

/// In-memory token store
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    credentials: Arc<RwLock<Credentials>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            credentials: Arc::new(RwLock::new(credentials)),
        }
    }
}

#[async_trait::async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self) -> Credentials {
        self.credentials
            .read()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    async fn set(&self, credentials: Credentials) -> Result<()> {
        *self
            .credentials
            .write()
            .map_err(|_| AuthError::InvalidResponse("Lock poisoned".to_string()))? = credentials;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.set(Credentials::default()).await
    }
}
