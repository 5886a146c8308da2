//! Scripted collaborators shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use ds_auth::{AuthError, RenewalRequest, RenewalResponse, TokenRenewer};
use parking_lot::Mutex;
use reqwest::StatusCode;
use tokio::sync::Notify;

use crate::error::{ApiError, Result};
use crate::headers::Headers;
use crate::request::{ApiRequest, ApiResponse};
use crate::transport::Transport;

type RenewFn = Box<dyn Fn(&RenewalRequest) -> ds_auth::Result<RenewalResponse> + Send + Sync>;

/// Renewer with a scripted answer and an optional gate holding it back
pub struct MockRenewer {
    calls: AtomicUsize,
    requests: Mutex<Vec<RenewalRequest>>,
    gate: Option<Notify>,
    respond: RenewFn,
}

impl MockRenewer {
    pub fn new(
        respond: impl Fn(&RenewalRequest) -> ds_auth::Result<RenewalResponse>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            gate: None,
            respond: Box::new(respond),
        }
    }

    pub fn issuing(access_token: &'static str) -> Self {
        Self::new(move |_| {
            Ok(RenewalResponse {
                access_token: Some(access_token.to_string()),
                id_token: None,
            })
        })
    }

    pub fn failing() -> Self {
        Self::new(|_| {
            Err(AuthError::InvalidResponse(
                "renewal endpoint unreachable".to_string(),
            ))
        })
    }

    /// Hold every renewal until `release` is called
    pub fn gated(mut self) -> Self {
        self.gate = Some(Notify::new());
        self
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RenewalRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait::async_trait]
impl TokenRenewer for MockRenewer {
    async fn renew(&self, request: &RenewalRequest) -> ds_auth::Result<RenewalResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        (self.respond)(request)
    }
}

type RouteFn = Box<dyn Fn(&ApiRequest) -> Result<ApiResponse> + Send + Sync>;

/// Transport answering through a routing closure and recording every call
pub struct MockTransport {
    sent: Mutex<Vec<ApiRequest>>,
    route: RouteFn,
}

impl MockTransport {
    pub fn new(route: impl Fn(&ApiRequest) -> Result<ApiResponse> + Send + Sync + 'static) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            route: Box::new(route),
        }
    }

    /// Answers 200 when the bearer token matches `valid`, 401 otherwise
    pub fn accepting(valid: &'static str) -> Self {
        Self::new(move |request| match request.headers.bearer() {
            Some(token) if token == valid => Ok(ApiResponse::new(StatusCode::OK, "ok")),
            _ => Err(status_error(StatusCode::UNAUTHORIZED, "token expired")),
        })
    }

    pub fn sent(&self) -> Vec<ApiRequest> {
        self.sent.lock().clone()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.sent.lock().push(request.clone());
        tokio::task::yield_now().await;
        (self.route)(request)
    }
}

pub fn status_error(status: StatusCode, body: &'static str) -> ApiError {
    ApiError::Http {
        status,
        headers: Headers::new(),
        body: Bytes::from_static(body.as_bytes()),
    }
}
