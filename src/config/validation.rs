//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that every playlist URL is absolute and unique
//! - Validate value ranges (error codes, redirect status, timeouts)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: InterceptorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashMap;

use crate::config::schema::{InterceptorConfig, PlaylistConfig};
use crate::registry::MASTER_NAME;

/// Redirect statuses the HTTP host may use.
pub const REDIRECT_STATUSES: [u16; 5] = [301, 302, 303, 307, 308];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("marker {0:?} cannot start a url scheme")]
    InvalidMarker(char),
    #[error("playlist '{name}' has invalid url '{url}': {reason}")]
    InvalidUrl {
        name: String,
        url: String,
        reason: String,
    },
    #[error("playlist '{0}' must set exactly one of content and content_path")]
    ContentSource(String),
    #[error("playlists[{0}] has no name")]
    MissingName(usize),
    #[error("playlist url '{url}' is used by both '{first}' and '{second}'")]
    DuplicateUrl {
        url: String,
        first: String,
        second: String,
    },
    #[error("malformed_url_error_code {0} is not in 400..=599")]
    ErrorCode(u16),
    #[error("redirect_status {0} is not one of 301, 302, 303, 307, 308")]
    RedirectStatus(u16),
    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &InterceptorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let marker = config.interceptor.marker;
    if !marker.is_ascii_alphabetic() {
        errors.push(ValidationError::InvalidMarker(marker));
    }

    let code = config.interceptor.malformed_url_error_code;
    if !(400..=599).contains(&code) {
        errors.push(ValidationError::ErrorCode(code));
    }

    let status = config.interceptor.redirect_status;
    if !REDIRECT_STATUSES.contains(&status) {
        errors.push(ValidationError::RedirectStatus(status));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let mut seen: HashMap<&str, String> = HashMap::new();
    let master = std::iter::once((MASTER_NAME.to_string(), &config.master));
    let extra = config.playlists.iter().enumerate().map(|(i, p)| {
        if p.name.is_empty() {
            errors.push(ValidationError::MissingName(i));
        }
        (p.name.clone(), p)
    });
    let all: Vec<(String, &PlaylistConfig)> = master.chain(extra).collect();

    for (name, playlist) in all {
        if let Err(e) = url::Url::parse(&playlist.url) {
            errors.push(ValidationError::InvalidUrl {
                name: name.clone(),
                url: playlist.url.clone(),
                reason: e.to_string(),
            });
        }

        if playlist.content.is_some() == playlist.content_path.is_some() {
            errors.push(ValidationError::ContentSource(name.clone()));
        }

        if let Some(first) = seen.get(playlist.url.as_str()) {
            errors.push(ValidationError::DuplicateUrl {
                url: playlist.url.clone(),
                first: first.clone(),
                second: name,
            });
        } else {
            seen.insert(playlist.url.as_str(), name);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
