//! Response construction.
//!
//! # Responsibilities
//! - Map a host completion to an HTTP response
//! - Produce a valid `Location` header for redirects
//!
//! # Design Decisions
//! - Inline playlists are never cached by the client (`no-cache`)
//! - Error codes outside 4xx/5xx fall back to 400 Bad Request

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::http::request::HostCompletion;

/// Content-Type for HLS playlists.
pub const PLAYLIST_CONTENT_TYPE: &str = "application/vnd.apple.mpegurl";

/// Build the response for a completed request.
pub fn completion_response(completion: HostCompletion, redirect_status: StatusCode) -> Response {
    match completion {
        HostCompletion::Inline(content) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, PLAYLIST_CONTENT_TYPE),
                (header::CACHE_CONTROL, "no-cache"),
            ],
            Body::from(content),
        )
            .into_response(),
        HostCompletion::Redirect(target) => match location(&target) {
            Some(value) => (redirect_status, [(header::LOCATION, value)]).into_response(),
            None => {
                tracing::error!(target = %target, "Redirect target is not a valid header value");
                (StatusCode::INTERNAL_SERVER_ERROR, "Invalid redirect target").into_response()
            }
        },
        HostCompletion::Error(code) => {
            let status = error_status(code);
            (status, status.canonical_reason().unwrap_or("Error")).into_response()
        }
    }
}

/// Status for an error code reported by the adapter.
pub fn error_status(code: u16) -> StatusCode {
    StatusCode::from_u16(code)
        .ok()
        .filter(|s| s.is_client_error() || s.is_server_error())
        .unwrap_or(StatusCode::BAD_REQUEST)
}

/// Header value for a redirect target.
///
/// ASCII targets are passed through verbatim. Non-ASCII targets are sent in
/// their `Url` serialization: percent-encoded path, punycode host.
fn location(target: &str) -> Option<HeaderValue> {
    if target.is_ascii() {
        return HeaderValue::from_str(target).ok();
    }
    let url = url::Url::parse(target).ok()?;
    HeaderValue::from_str(url.as_str()).ok()
}
