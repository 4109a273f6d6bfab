//! Playlist URL interception for adaptive streaming clients.

pub mod codec;
pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod loader;
pub mod observability;
pub mod registry;

pub use codec::UrlCodec;
pub use config::InterceptorConfig;
pub use dispatch::{Dispatcher, InterceptionDecision, RejectReason, SharedDispatcher};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use loader::{LoadingRequest, ResourceLoaderAdapter};
pub use registry::{PlaylistEntry, PlaylistRegistry};
