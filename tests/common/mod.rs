//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use playlist_interceptor::config::InterceptorConfig;
use playlist_interceptor::dispatch::{Dispatcher, SharedDispatcher};
use playlist_interceptor::http::HttpServer;
use playlist_interceptor::lifecycle::Shutdown;
use playlist_interceptor::loader::{ResourceLoaderAdapter, SerialExecutor};

pub const MASTER_URL: &str = "https://cdn.example.com/master.m3u8";
pub const MASTER_PLAYLIST: &str = "#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=1280000\nhttps://cdn.example.com/720p.m3u8\n";
pub const AUDIO_URL: &str = "https://cdn.example.com/audio.m3u8";
pub const AUDIO_PLAYLIST: &str = "#EXTM3U\n#EXT-X-MEDIA:TYPE=AUDIO\n";

/// A valid configuration with the master and one extra playlist.
pub fn test_config() -> InterceptorConfig {
    let mut config = InterceptorConfig::default();
    config.master.url = MASTER_URL.to_string();
    config.master.content = Some(MASTER_PLAYLIST.to_string());
    config.playlists.push(playlist_interceptor::config::PlaylistConfig {
        name: "audio".to_string(),
        url: AUDIO_URL.to_string(),
        content: Some(AUDIO_PLAYLIST.to_string()),
        content_path: None,
    });
    config
}

/// A running interceptor bound to an ephemeral port.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub shared: SharedDispatcher,
    pub shutdown: Shutdown,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start the HTTP host for `config` on 127.0.0.1:0.
#[allow(dead_code)]
pub async fn start_server(config: InterceptorConfig) -> TestServer {
    let shared = SharedDispatcher::new(Dispatcher::from_config(&config).unwrap());
    let (executor, _worker) = SerialExecutor::spawn();
    let adapter = ResourceLoaderAdapter::new(shared.clone(), Arc::new(executor))
        .with_malformed_url_error_code(config.interceptor.malformed_url_error_code);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config, adapter);
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestServer {
        addr,
        shared,
        shutdown,
    }
}

/// HTTP client that reports redirects instead of following them.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
