//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Hand playlist requests to the resource loader adapter
//! - Report the active dispatcher snapshot on `/status`
//! - Stop on the lifecycle shutdown broadcast

use axum::{
    body::Body,
    extract::{Query, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::InterceptorConfig;
use crate::http::request::{HttpLoadingRequest, MakeRequestUuidV4, X_REQUEST_ID};
use crate::http::response::completion_response;
use crate::loader::ResourceLoaderAdapter;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub adapter: ResourceLoaderAdapter,
    pub redirect_status: StatusCode,
}

/// Query parameters of `/load`.
#[derive(Debug, Deserialize)]
pub struct LoadParams {
    /// The marked URL, as the player would request it.
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlaylistStatus {
    pub name: String,
    pub url: String,
    pub bytes: usize,
    pub master: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemStatus {
    pub version: String,
    pub marker: char,
    pub master_url: String,
    pub playlists: Vec<PlaylistStatus>,
}

/// HTTP host exposing the adapter.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server around `adapter`.
    pub fn new(config: &InterceptorConfig, adapter: ResourceLoaderAdapter) -> Self {
        let redirect_status = StatusCode::from_u16(config.interceptor.redirect_status)
            .unwrap_or(StatusCode::MOVED_PERMANENTLY);

        let state = AppState {
            adapter,
            redirect_status,
        };

        let router = Self::build_router(config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &InterceptorConfig, state: AppState) -> Router {
        Router::new()
            .route("/load", get(load_handler))
            .route("/status", get(status_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                        let request_id = req
                            .headers()
                            .get(X_REQUEST_ID)
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("unknown");
                        tracing::info_span!(
                            "request",
                            request_id = %request_id,
                            method = %req.method(),
                            uri = %req.uri(),
                        )
                    }))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until the shutdown broadcast fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Resource loading entry point.
async fn load_handler(
    State(state): State<AppState>,
    Query(params): Query<LoadParams>,
) -> Response {
    let (request, completion) = HttpLoadingRequest::new(params.url);

    if !state.adapter.on_should_load(request) {
        return (StatusCode::NOT_FOUND, "Request is not marked for interception").into_response();
    }

    match completion.await {
        Ok(completion) => completion_response(completion, state.redirect_status),
        Err(_) => {
            tracing::error!("Claimed request dropped without completion");
            (StatusCode::INTERNAL_SERVER_ERROR, "Request was not completed").into_response()
        }
    }
}

async fn status_handler(State(state): State<AppState>) -> Json<SystemStatus> {
    let snapshot = state.adapter.dispatcher().load();
    let registry = snapshot.registry();

    let mut playlists: Vec<PlaylistStatus> = registry
        .iter()
        .map(|(url, entry)| PlaylistStatus {
            name: entry.name.clone(),
            url: url.to_string(),
            bytes: entry.content.len(),
            master: entry.is_master,
        })
        .collect();
    playlists.sort_by(|a, b| a.url.cmp(&b.url));

    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        marker: snapshot.codec().marker(),
        master_url: registry.master_url().to_string(),
        playlists,
    })
}
