//! Playlist interceptor (v1)
//!
//! Serves registered playlists from memory and redirects everything else,
//! for requests whose URL scheme carries the interception marker.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌───────────────────────────────────────────────────────┐
//!                     │                 PLAYLIST INTERCEPTOR                    │
//!   Player request    │  ┌──────────┐   ┌────────────┐   ┌────────────┐        │
//!   ──────────────────┼─▶│   http   │──▶│   loader   │──▶│  dispatch  │        │
//!                     │  │   host   │   │  adapter   │   │            │        │
//!                     │  └──────────┘   └─────┬──────┘   └─────┬──────┘        │
//!                     │        ▲              │                │               │
//!                     │        │        completion         codec + registry    │
//!   Inline / 3xx / 4xx│        │          queue                                │
//!   ◀─────────────────┼────────┴──────────────┘                                │
//!                     │                                                        │
//!                     │  config (+ hot reload) · observability · lifecycle     │
//!                     └───────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use playlist_interceptor::config::{load_config, watcher};
use playlist_interceptor::http::HttpServer;
use playlist_interceptor::lifecycle::{signals, startup, Shutdown};
use playlist_interceptor::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "playlist-interceptor")]
#[command(about = "Serve or redirect marked playlist requests", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "interceptor.toml")]
    config: PathBuf,

    /// Reload playlists when the configuration or playlist files change.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(&args.config)?;
    logging::init_logging(&config.observability);

    tracing::info!("playlist-interceptor v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        path = %args.config.display(),
        bind_address = %config.listener.bind_address,
        marker = %config.interceptor.marker,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let core = startup::initialize(&config)?;

    // Kept alive for the lifetime of the process; dropping it stops watching.
    let _watcher = if args.watch {
        let (config_watcher, updates) = watcher::ConfigWatcher::new(&args.config, &config);
        let handle = config_watcher.run()?;
        tokio::spawn(watcher::apply_updates(updates, core.shared.clone()));
        Some(handle)
    } else {
        None
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config, core.adapter);
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    signals::shutdown_on_signal(&shutdown).await;
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
