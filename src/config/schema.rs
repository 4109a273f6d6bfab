//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::codec::DEFAULT_MARKER;
use crate::loader::BAD_REQUEST_ERROR_CODE;

/// Root configuration for the interceptor.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct InterceptorConfig {
    /// Marker and error-mapping settings.
    pub interceptor: InterceptionConfig,

    /// The master playlist.
    pub master: PlaylistConfig,

    /// Additional inline playlists.
    pub playlists: Vec<PlaylistConfig>,

    /// HTTP host listener.
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// How requests are recognized and how failures are reported.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InterceptionConfig {
    /// First character marking an interceptable URL.
    pub marker: char,

    /// Error code reported when the canonical URL does not parse.
    pub malformed_url_error_code: u16,

    /// HTTP status used by the HTTP host for redirects.
    pub redirect_status: u16,
}

impl Default for InterceptionConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER,
            malformed_url_error_code: BAD_REQUEST_ERROR_CODE,
            redirect_status: 301,
        }
    }
}

/// An inline playlist.
///
/// Exactly one of `content` and `content_path` must be set. The loader
/// reads `content_path` (relative to the config file) into `content` and
/// replaces it with the resolved path.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PlaylistConfig {
    /// Identifier for logging and status output.
    pub name: String,

    /// Canonical URL, matched exactly.
    pub url: String,

    /// Playlist text.
    pub content: Option<String>,

    /// Path to a playlist file.
    pub content_path: Option<PathBuf>,
}

impl InterceptorConfig {
    /// Playlist files referenced through `content_path`, master first.
    pub fn content_paths(&self) -> Vec<PathBuf> {
        std::iter::once(&self.master)
            .chain(&self.playlists)
            .filter_map(|p| p.content_path.clone())
            .collect()
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
