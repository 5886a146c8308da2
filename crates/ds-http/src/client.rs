use std::sync::Arc;

use ds_auth::{ClientConfig, Credentials, HttpTokenRenewer, TokenRenewer, TokenStore};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument};

use crate::authenticator::RequestAuthenticator;
use crate::coordinator::RefreshCoordinator;
use crate::error::Result;
use crate::events::AuthEvent;
use crate::middleware::{Dispatch, Pipeline};
use crate::paths::{PathClass, PathClassifier};
use crate::request::{ApiRequest, ApiResponse};
use crate::response_handler::ResponseAuthHandler;
use crate::transport::{ReqwestTransport, Transport};

/// Authenticated API client
///
/// Every request goes through the bearer-token authenticator and the
/// refresh-and-replay handler. Clones share the pipeline, the token store and
/// the refresh coordinator.
#[derive(Clone)]
pub struct ApiClient {
    pipeline: Arc<Pipeline>,
    coordinator: RefreshCoordinator,
    classifier: PathClassifier,
    store: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Create a client talking HTTP to `config.base_url`
    pub fn new(config: &ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        let transport = ReqwestTransport::new(config)?;
        let renewer = HttpTokenRenewer::with_client(config, transport.client().clone())?;

        Ok(Self::with_parts(
            config,
            store,
            Arc::new(transport),
            Arc::new(renewer),
        ))
    }

    /// Create a client from explicit collaborators
    pub fn with_parts(
        config: &ClientConfig,
        store: Arc<dyn TokenStore>,
        transport: Arc<dyn Transport>,
        renewer: Arc<dyn TokenRenewer>,
    ) -> Self {
        let classifier = PathClassifier::from_config(config);
        let coordinator = RefreshCoordinator::new(Arc::clone(&store), renewer);

        let pipeline = Pipeline::new(transport)
            .with_request_hook(Arc::new(RequestAuthenticator::new(
                classifier.clone(),
                Arc::clone(&store),
            )))
            .with_response_hook(Arc::new(ResponseAuthHandler::new(
                classifier.clone(),
                coordinator.clone(),
            )));

        Self {
            pipeline: Arc::new(pipeline),
            coordinator,
            classifier,
            store,
        }
    }

    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.pipeline.dispatch(request).await
    }

    pub async fn get(&self, url: &str) -> Result<ApiResponse> {
        self.send(ApiRequest::get(url)).await
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<ApiResponse> {
        self.send(ApiRequest::post(url).json(body)?).await
    }

    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<ApiResponse> {
        self.send(ApiRequest::put(url).json(body)?).await
    }

    pub async fn delete(&self, url: &str) -> Result<ApiResponse> {
        self.send(ApiRequest::delete(url)).await
    }

    /// Store the credentials obtained from a completed sign-in
    #[instrument(skip_all, fields(email = %credentials.email))]
    pub async fn sign_in_with(&self, credentials: Credentials) -> ds_auth::Result<()> {
        self.store.set(credentials).await?;
        info!("Signed in");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> ds_auth::Result<()> {
        self.store.clear().await?;
        info!("Signed out");
        Ok(())
    }

    pub async fn credentials(&self) -> Credentials {
        self.store.get().await
    }

    pub fn classify(&self, url: &str) -> PathClass {
        self.classifier.classify(url)
    }

    pub fn is_refreshing(&self) -> bool {
        self.coordinator.is_refreshing()
    }

    /// Subscribe to renewal outcomes; `SessionExpired` means the user has to
    /// sign in again
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        debug!("New auth event subscriber");
        self.coordinator.subscribe()
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("pipeline", &self.pipeline)
            .field("coordinator", &self.coordinator)
            .field("classifier", &self.classifier)
            .finish_non_exhaustive()
    }
}
