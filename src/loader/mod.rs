//! Resource loader adapter: the seam between the dispatcher and a host.
//!
//! # Data Flow
//! ```text
//! host ─ on_should_load(request) ─▶ adapter
//!                                     │ snapshot = shared.load()
//!                                     │ decision = snapshot.handle(url, scheme)
//!                                     ├─ NotIntercepted ─▶ return false
//!                                     └─ otherwise ─▶ executor.execute(complete) ─▶ return true
//!
//! executor:
//!     is_cancelled()? ─ yes ─▶ drop request, no completion
//!                     └ no ──▶ exactly one of
//!                               complete_with_inline_content / _redirect / _error
//! ```
//!
//! # Design Decisions
//! - Completion methods consume the request, so a second call cannot compile
//! - Decision is made before claiming; a claimed request always completes
//! - The executor is the only hand-off point to the host's context

pub mod executor;

use bytes::Bytes;
use std::sync::Arc;

use crate::codec;
use crate::dispatch::{InterceptionDecision, RejectReason, SharedDispatcher};
use crate::observability::metrics;

pub use executor::{CompletionExecutor, InlineExecutor, Job, SerialExecutor};

/// Default error code reported for malformed URLs.
pub const BAD_REQUEST_ERROR_CODE: u16 = 400;

/// A host-framework loading request.
///
/// The completion methods take `self`: once one has been called the request
/// is gone.
pub trait LoadingRequest: Send + 'static {
    /// Full request URL as the host sees it (marker included).
    fn url(&self) -> &str;

    /// Scheme of the request URL, if it has one.
    fn scheme(&self) -> Option<&str> {
        codec::scheme_of(self.url())
    }

    /// True once the host has given up on this request.
    fn is_cancelled(&self) -> bool {
        false
    }

    fn complete_with_inline_content(self, content: Bytes);

    fn complete_with_redirect(self, target_url: String);

    fn complete_with_error(self, error_code: u16);
}

/// Translates dispatcher decisions into host completion calls.
#[derive(Clone)]
pub struct ResourceLoaderAdapter {
    dispatcher: SharedDispatcher,
    executor: Arc<dyn CompletionExecutor>,
    malformed_url_error_code: u16,
}

impl ResourceLoaderAdapter {
    pub fn new(dispatcher: SharedDispatcher, executor: Arc<dyn CompletionExecutor>) -> Self {
        Self {
            dispatcher,
            executor,
            malformed_url_error_code: BAD_REQUEST_ERROR_CODE,
        }
    }

    /// Override the error code reported for malformed URLs.
    pub fn with_malformed_url_error_code(mut self, code: u16) -> Self {
        self.malformed_url_error_code = code;
        self
    }

    pub fn dispatcher(&self) -> &SharedDispatcher {
        &self.dispatcher
    }

    /// Returns true if the request is claimed.
    ///
    /// A claimed request is completed exactly once on the executor, unless
    /// the host cancels it first. An unclaimed request is dropped untouched
    /// and the host should load it through its default path.
    pub fn on_should_load<R: LoadingRequest>(&self, request: R) -> bool {
        let Some(scheme) = request.scheme() else {
            tracing::debug!(url = %request.url(), "Request has no scheme, not claimed");
            return false;
        };

        let snapshot = self.dispatcher.load();
        let decision = snapshot.handle(request.url(), scheme);
        if decision == InterceptionDecision::Reject(RejectReason::NotIntercepted) {
            return false;
        }

        let error_code = self.malformed_url_error_code;
        self.executor
            .execute(Box::new(move || complete(request, decision, error_code)));
        true
    }
}

/// Perform the single host completion for a claimed request.
fn complete<R: LoadingRequest>(request: R, decision: InterceptionDecision, error_code: u16) {
    if request.is_cancelled() {
        tracing::debug!(url = %request.url(), "Request cancelled before completion");
        metrics::record_cancelled();
        return;
    }

    match decision {
        InterceptionDecision::ServeInline(content) => {
            metrics::record_completion("inline");
            request.complete_with_inline_content(content);
        }
        InterceptionDecision::Redirect(target) => {
            metrics::record_completion("redirect");
            request.complete_with_redirect(target);
        }
        InterceptionDecision::Reject(reason) => {
            tracing::warn!(url = %request.url(), %reason, error_code, "Rejecting request");
            metrics::record_completion("error");
            request.complete_with_error(error_code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::UrlCodec;
    use crate::dispatch::Dispatcher;
    use crate::registry::PlaylistRegistry;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    const MASTER: &str = "https://cdn.example.com/master.m3u8";

    #[derive(Debug, Clone, PartialEq)]
    enum Completion {
        Inline(Bytes),
        Redirect(String),
        Error(u16),
    }

    struct MockRequest {
        url: String,
        cancelled: Arc<AtomicBool>,
        log: Arc<Mutex<Vec<Completion>>>,
    }

    impl LoadingRequest for MockRequest {
        fn url(&self) -> &str {
            &self.url
        }
        fn is_cancelled(&self) -> bool {
            self.cancelled.load(Ordering::SeqCst)
        }
        fn complete_with_inline_content(self, content: Bytes) {
            self.log.lock().unwrap().push(Completion::Inline(content));
        }
        fn complete_with_redirect(self, target_url: String) {
            self.log.lock().unwrap().push(Completion::Redirect(target_url));
        }
        fn complete_with_error(self, error_code: u16) {
            self.log.lock().unwrap().push(Completion::Error(error_code));
        }
    }

    fn adapter() -> ResourceLoaderAdapter {
        let dispatcher = Dispatcher::new(
            UrlCodec::default(),
            PlaylistRegistry::new(MASTER, "#EXTM3U\n"),
        );
        ResourceLoaderAdapter::new(SharedDispatcher::new(dispatcher), Arc::new(InlineExecutor))
    }

    fn run(adapter: &ResourceLoaderAdapter, url: &str) -> (bool, Vec<Completion>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let claimed = adapter.on_should_load(MockRequest {
            url: url.to_string(),
            cancelled: Arc::new(AtomicBool::new(false)),
            log: log.clone(),
        });
        let log = log.lock().unwrap().clone();
        (claimed, log)
    }

    #[test]
    fn test_master_completes_inline() {
        let (claimed, log) = run(&adapter(), "uhttps://cdn.example.com/master.m3u8");
        assert!(claimed);
        assert_eq!(log, vec![Completion::Inline(Bytes::from_static(b"#EXTM3U\n"))]);
    }

    #[test]
    fn test_other_url_completes_with_redirect() {
        let (claimed, log) = run(&adapter(), "uhttp://example.com/seg1.ts");
        assert!(claimed);
        assert_eq!(log, vec![Completion::Redirect("http://example.com/seg1.ts".into())]);
    }

    #[test]
    fn test_unmarked_not_claimed() {
        let (claimed, log) = run(&adapter(), "https://cdn.example.com/master.m3u8");
        assert!(!claimed);
        assert!(log.is_empty());
    }

    #[test]
    fn test_missing_scheme_not_claimed() {
        let (claimed, log) = run(&adapter(), "u//cdn.example.com/master.m3u8");
        assert!(!claimed);
        assert!(log.is_empty());
    }

    #[test]
    fn test_malformed_completes_with_configured_code() {
        let adapter = adapter().with_malformed_url_error_code(422);
        // Decodes to ":", which is not an absolute URL.
        let (claimed, log) = run(&adapter, "u:");
        assert!(claimed);
        assert_eq!(log, vec![Completion::Error(422)]);
    }

    #[test]
    fn test_cancelled_request_not_completed() {
        let adapter = adapter();
        let log = Arc::new(Mutex::new(Vec::new()));
        let claimed = adapter.on_should_load(MockRequest {
            url: "uhttp://example.com/seg1.ts".into(),
            cancelled: Arc::new(AtomicBool::new(true)),
            log: log.clone(),
        });
        assert!(claimed);
        assert!(log.lock().unwrap().is_empty());
    }
}
