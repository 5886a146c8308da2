use std::sync::Arc;

use ds_auth::TokenStore;
use tracing::trace;

use crate::error::Result;
use crate::middleware::RequestHook;
use crate::paths::{PathClass, PathClassifier};
use crate::request::ApiRequest;

/// Attaches the current access token to requests on protected paths
pub struct RequestAuthenticator {
    classifier: PathClassifier,
    store: Arc<dyn TokenStore>,
}

impl RequestAuthenticator {
    pub fn new(classifier: PathClassifier, store: Arc<dyn TokenStore>) -> Self {
        Self { classifier, store }
    }
}

#[async_trait::async_trait]
impl RequestHook for RequestAuthenticator {
    async fn on_request(&self, mut request: ApiRequest) -> Result<ApiRequest> {
        if self.classifier.classify(&request.url) != PathClass::Protected {
            return Ok(request);
        }

        let credentials = self.store.get().await;
        if credentials.is_authenticated() {
            request.headers.set_bearer(&credentials.access_token);
        } else {
            trace!(url = %request.url, "no access token to attach");
        }
        Ok(request)
    }
}
