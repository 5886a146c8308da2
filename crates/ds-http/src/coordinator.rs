//! Single-flight access token renewal.
//!
//! The coordinator is either idle or refreshing. The first caller that asks
//! for a refresh while idle dispatches the one renewal call; every caller that
//! asks while a renewal is in flight is queued as a waiter and served by that
//! renewal's outcome. When the renewal settles the store is updated (or
//! cleared), then every waiter is notified in registration order and the
//! coordinator is idle again.

use std::sync::Arc;

use ds_auth::{AuthError, RenewalRequest, TokenRenewer, TokenStore};
use parking_lot::Mutex;
use tokio::sync::{broadcast, oneshot};
use tracing::{debug, error, info, instrument, warn};

use crate::events::{self, AuthEvent};

type Waiter = oneshot::Sender<Option<String>>;

#[derive(Default)]
struct Flight {
    in_flight: bool,
    waiters: Vec<Waiter>,
}

struct Inner {
    store: Arc<dyn TokenStore>,
    renewer: Arc<dyn TokenRenewer>,
    flight: Mutex<Flight>,
    events: broadcast::Sender<AuthEvent>,
}

/// Coordinates access token renewal for one API client
#[derive(Clone)]
pub struct RefreshCoordinator {
    inner: Arc<Inner>,
}

impl RefreshCoordinator {
    pub fn new(store: Arc<dyn TokenStore>, renewer: Arc<dyn TokenRenewer>) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                renewer,
                flight: Mutex::new(Flight::default()),
                events: events::channel(),
            }),
        }
    }

    /// Obtain a fresh access token, joining the in-flight renewal if any
    ///
    /// Returns `None` when the renewal failed; by then the token store has
    /// been cleared.
    #[instrument(skip(self))]
    pub async fn request_refresh(&self) -> Option<String> {
        let (tx, rx) = oneshot::channel();
        let dispatch = {
            let mut flight = self.inner.flight.lock();
            flight.waiters.push(tx);
            !std::mem::replace(&mut flight.in_flight, true)
        };

        if dispatch {
            debug!("Dispatching token renewal");
            // Detached so that a cancelled caller cannot strand the other waiters.
            let inner = Arc::clone(&self.inner);
            tokio::spawn(async move { inner.run_flight().await });
        } else {
            debug!("Joining in-flight token renewal");
        }

        rx.await.unwrap_or(None)
    }

    pub fn is_refreshing(&self) -> bool {
        self.inner.flight.lock().in_flight
    }

    /// Number of callers waiting on the in-flight renewal
    pub fn waiting(&self) -> usize {
        self.inner.flight.lock().waiters.len()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.inner.events.subscribe()
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let flight = self.inner.flight.lock();
        f.debug_struct("RefreshCoordinator")
            .field("in_flight", &flight.in_flight)
            .field("waiters", &flight.waiters.len())
            .finish()
    }
}

impl Inner {
    async fn run_flight(&self) {
        // Resets the flight and notifies waiters even if renewal panics.
        let mut settle = Settle {
            flight: &self.flight,
            token: None,
        };

        match self.renew().await {
            Ok(token) => {
                info!("Access token renewed");
                let _ = self.events.send(AuthEvent::TokenRenewed);
                settle.token = Some(token);
            }
            Err(AuthError::CredentialsChanged) => {
                // Signed out or switched accounts; the current session is not ours to touch.
                info!("Credentials changed during renewal, discarding renewed token");
            }
            Err(e) => {
                warn!("Token renewal failed, clearing credentials: {}", e);
                if let Err(e) = self.store.clear().await {
                    error!("Failed to clear credentials: {}", e);
                }
                let _ = self.events.send(AuthEvent::SessionExpired {
                    reason: e.to_string(),
                });
            }
        }
    }

    async fn renew(&self) -> ds_auth::Result<String> {
        let credentials = self.store.get().await;
        if credentials.refresh_token.is_empty() {
            return Err(AuthError::MissingRefreshToken);
        }
        if credentials.email.is_empty() {
            return Err(AuthError::MissingEmail);
        }

        let request = RenewalRequest {
            email: credentials.email,
            refresh_token: credentials.refresh_token,
        };
        let response = self.renewer.renew(&request).await?;
        let access_token = response
            .access_token()
            .ok_or(AuthError::MissingAccessToken)?
            .to_string();
        let id_token = response.id_token.filter(|t| !t.is_empty());

        // The store may have changed while the renewal was in flight.
        let current = self.store.get().await;
        if current.refresh_token != request.refresh_token || current.email != request.email {
            return Err(AuthError::CredentialsChanged);
        }
        self.store
            .set(current.renewed(access_token.clone(), id_token))
            .await?;

        Ok(access_token)
    }
}

struct Settle<'a> {
    flight: &'a Mutex<Flight>,
    token: Option<String>,
}

impl Drop for Settle<'_> {
    fn drop(&mut self) {
        let waiters = {
            let mut flight = self.flight.lock();
            flight.in_flight = false;
            std::mem::take(&mut flight.waiters)
        };

        debug!(
            waiters = waiters.len(),
            renewed = self.token.is_some(),
            "Token renewal settled"
        );
        for waiter in waiters {
            // The caller may have gone away; its replay is simply skipped.
            let _ = waiter.send(self.token.clone());
        }
    }
}
