//! Request handling.
//!
//! # Responsibilities
//! - Generate a UUID v4 request ID for every request
//! - Wrap an incoming playlist request as a host `LoadingRequest`
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Completion is delivered over a oneshot; a closed channel means cancelled

use axum::http::{HeaderValue, Request};
use bytes::Bytes;
use tokio::sync::oneshot;
use tower_http::request_id::{MakeRequestId, RequestId};

use crate::loader::LoadingRequest;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// The completion delivered back to the HTTP handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCompletion {
    Inline(Bytes),
    Redirect(String),
    Error(u16),
}

/// A loading request backed by an HTTP exchange.
#[derive(Debug)]
pub struct HttpLoadingRequest {
    url: String,
    tx: oneshot::Sender<HostCompletion>,
}

impl HttpLoadingRequest {
    /// Create a request and the receiver its completion arrives on.
    pub fn new(url: impl Into<String>) -> (Self, oneshot::Receiver<HostCompletion>) {
        let (tx, rx) = oneshot::channel();
        (Self { url: url.into(), tx }, rx)
    }

    fn send(self, completion: HostCompletion) {
        if self.tx.send(completion).is_err() {
            tracing::debug!(url = %self.url, "Client went away before completion");
        }
    }
}

impl LoadingRequest for HttpLoadingRequest {
    fn url(&self) -> &str {
        &self.url
    }

    fn is_cancelled(&self) -> bool {
        self.tx.is_closed()
    }

    fn complete_with_inline_content(self, content: Bytes) {
        self.send(HostCompletion::Inline(content));
    }

    fn complete_with_redirect(self, target_url: String) {
        self.send(HostCompletion::Redirect(target_url));
    }

    fn complete_with_error(self, error_code: u16) {
        self.send(HostCompletion::Error(error_code));
    }
}
