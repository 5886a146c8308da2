//! Explicit request/response middleware.
//!
//! A [`Pipeline`] owns a transport and two ordered hook lists. Request hooks
//! run in registration order before the transport; response hooks run in
//! registration order on the transport's outcome, each receiving the request
//! as it was sent and a [`Dispatch`] handle for replays.

use std::sync::Arc;

use tracing::trace;

use crate::error::Result;
use crate::request::{ApiRequest, ApiResponse};
use crate::transport::Transport;

/// Pre-send hook
#[async_trait::async_trait]
pub trait RequestHook: Send + Sync {
    async fn on_request(&self, request: ApiRequest) -> Result<ApiRequest>;
}

/// Post-send hook, sees both successes and failures
#[async_trait::async_trait]
pub trait ResponseHook: Send + Sync {
    async fn on_response(
        &self,
        request: &ApiRequest,
        outcome: Result<ApiResponse>,
        dispatcher: &dyn Dispatch,
    ) -> Result<ApiResponse>;
}

/// Something that can run a request through the full hook chain
#[async_trait::async_trait]
pub trait Dispatch: Send + Sync {
    async fn dispatch(&self, request: ApiRequest) -> Result<ApiResponse>;
}

pub struct Pipeline {
    transport: Arc<dyn Transport>,
    request_hooks: Vec<Arc<dyn RequestHook>>,
    response_hooks: Vec<Arc<dyn ResponseHook>>,
}

impl Pipeline {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            request_hooks: Vec::new(),
            response_hooks: Vec::new(),
        }
    }

    pub fn with_request_hook(mut self, hook: Arc<dyn RequestHook>) -> Self {
        self.request_hooks.push(hook);
        self
    }

    pub fn with_response_hook(mut self, hook: Arc<dyn ResponseHook>) -> Self {
        self.response_hooks.push(hook);
        self
    }
}

#[async_trait::async_trait]
impl Dispatch for Pipeline {
    async fn dispatch(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        for hook in &self.request_hooks {
            request = hook.on_request(request).await?;
        }

        trace!(
            method = %request.method,
            url = %request.url,
            retried = request.retried,
            "dispatching"
        );
        let mut outcome = self.transport.send(&request).await;

        for hook in &self.response_hooks {
            outcome = hook.on_response(&request, outcome, self).await;
        }
        outcome
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("request_hooks", &self.request_hooks.len())
            .field("response_hooks", &self.response_hooks.len())
            .finish()
    }
}
