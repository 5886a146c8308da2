use tracing::{debug, instrument};

use crate::coordinator::RefreshCoordinator;
use crate::error::Result;
use crate::middleware::{Dispatch, ResponseHook};
use crate::paths::{PathClass, PathClassifier};
use crate::request::{ApiRequest, ApiResponse};

/// Recovers from expired access tokens by refreshing once and replaying
///
/// Only a 401 on a protected request that has not been retried yet is
/// handled; every other outcome is returned untouched.
pub struct ResponseAuthHandler {
    classifier: PathClassifier,
    coordinator: RefreshCoordinator,
}

impl ResponseAuthHandler {
    pub fn new(classifier: PathClassifier, coordinator: RefreshCoordinator) -> Self {
        Self {
            classifier,
            coordinator,
        }
    }
}

#[async_trait::async_trait]
impl ResponseHook for ResponseAuthHandler {
    #[instrument(skip_all, fields(url = %request.url))]
    async fn on_response(
        &self,
        request: &ApiRequest,
        outcome: Result<ApiResponse>,
        dispatcher: &dyn Dispatch,
    ) -> Result<ApiResponse> {
        let err = match outcome {
            Ok(response) => return Ok(response),
            Err(err) => err,
        };

        if !err.is_auth_expiry() {
            return Err(err);
        }
        if self.classifier.classify(&request.url) != PathClass::Protected {
            debug!("401 on unprotected path, not refreshing");
            return Err(err);
        }
        if request.retried {
            debug!("401 after refresh, giving up");
            return Err(err);
        }

        let mut replay = request.clone();
        replay.retried = true;

        match self.coordinator.request_refresh().await {
            Some(token) => {
                debug!("Replaying request with renewed token");
                replay.headers.set_bearer(&token);
                dispatcher.dispatch(replay).await
            }
            None => Err(err),
        }
    }
}
