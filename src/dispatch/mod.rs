//! Interception dispatcher.
//!
//! # Data Flow
//! ```text
//! (request_url, scheme)
//!     → codec: is the scheme marked?          no  → Reject(NotIntercepted)
//!     → codec: strip marker
//!     → url: parse canonical URL               err → Reject(MalformedUrl)
//!     → registry: exact lookup                 hit → ServeInline(content)
//!                                              miss → Redirect(canonical URL)
//! ```
//!
//! # Design Decisions
//! - Pure classification; no I/O and no host calls
//! - Deterministic: same input and snapshot always give the same decision
//! - Snapshots are swapped whole via `SharedDispatcher`

use arc_swap::ArcSwap;
use bytes::Bytes;
use std::sync::Arc;

use crate::codec::UrlCodec;
use crate::config::schema::InterceptorConfig;
use crate::observability::metrics;
use crate::registry::{PlaylistRegistry, RegistryError};

/// Why a request was not served or redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    /// Not ours; the host should load it the normal way.
    #[error("request is not marked for interception")]
    NotIntercepted,
    #[error("malformed url: {0}")]
    MalformedUrl(url::ParseError),
}

/// Outcome for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterceptionDecision {
    Reject(RejectReason),
    ServeInline(Bytes),
    Redirect(String),
}

impl InterceptionDecision {
    /// Label used for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            InterceptionDecision::Reject(RejectReason::NotIntercepted) => "not_intercepted",
            InterceptionDecision::Reject(RejectReason::MalformedUrl(_)) => "malformed_url",
            InterceptionDecision::ServeInline(_) => "serve_inline",
            InterceptionDecision::Redirect(_) => "redirect",
        }
    }
}

/// Classifies requests against an immutable registry.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    codec: UrlCodec,
    registry: PlaylistRegistry,
}

impl Dispatcher {
    pub fn new(codec: UrlCodec, registry: PlaylistRegistry) -> Self {
        Self { codec, registry }
    }

    /// Build a dispatcher snapshot from a loaded configuration.
    pub fn from_config(config: &InterceptorConfig) -> Result<Self, RegistryError> {
        let registry = PlaylistRegistry::from_config(config)?;
        Ok(Self::new(UrlCodec::new(config.interceptor.marker), registry))
    }

    pub fn codec(&self) -> &UrlCodec {
        &self.codec
    }

    pub fn registry(&self) -> &PlaylistRegistry {
        &self.registry
    }

    /// Decide what to do with a request.
    pub fn handle(&self, request_url: &str, scheme: &str) -> InterceptionDecision {
        let decision = self.classify(request_url, scheme);

        tracing::debug!(
            url = %request_url,
            scheme = %scheme,
            outcome = decision.outcome(),
            "Requested"
        );
        metrics::record_decision(decision.outcome());

        decision
    }

    fn classify(&self, request_url: &str, scheme: &str) -> InterceptionDecision {
        if !self.codec.is_marked(scheme) {
            return InterceptionDecision::Reject(RejectReason::NotIntercepted);
        }

        let canonical = self.codec.decode(request_url);
        if let Err(e) = url::Url::parse(canonical) {
            return InterceptionDecision::Reject(RejectReason::MalformedUrl(e));
        }

        match self.registry.lookup(canonical) {
            Some(entry) => InterceptionDecision::ServeInline(entry.content.clone()),
            None => InterceptionDecision::Redirect(canonical.to_string()),
        }
    }
}

/// Atomically replaceable dispatcher snapshot.
///
/// Readers call [`SharedDispatcher::load`] once per request and keep that
/// snapshot for the whole handling; reloads publish a new snapshot.
#[derive(Debug, Clone)]
pub struct SharedDispatcher {
    inner: Arc<ArcSwap<Dispatcher>>,
}

impl SharedDispatcher {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(dispatcher)),
        }
    }

    /// Current snapshot.
    pub fn load(&self) -> Arc<Dispatcher> {
        self.inner.load_full()
    }

    /// Publish a new snapshot.
    pub fn store(&self, dispatcher: Dispatcher) {
        self.inner.store(Arc::new(dispatcher));
        tracing::info!("Dispatcher snapshot replaced");
    }
}
