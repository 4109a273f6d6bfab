//! HTTP host for the resource loader adapter.
//!
//! # Data Flow
//! ```text
//! GET /load?url=<marked url>
//!     → request.rs (request ID, wrap URL in an HttpLoadingRequest)
//!     → ResourceLoaderAdapter::on_should_load
//!         not claimed → 404
//!         claimed     → await the single completion (oneshot)
//!     → response.rs (inline 200 / redirect 3xx / error 4xx-5xx)
//!     → Send to client
//! ```
//!
//! A client that disconnects drops the oneshot receiver, which the adapter
//! observes as a cancelled request.

pub mod request;
pub mod response;
pub mod server;

pub use request::{HostCompletion, HttpLoadingRequest, MakeRequestUuidV4, X_REQUEST_ID};
pub use server::HttpServer;
