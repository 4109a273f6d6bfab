//! Hot reload of the configuration file and the playlist files it reads.
//!
//! # Design Decisions
//! - Any change to a watched file reloads the whole configuration
//! - A reload that fails to load or validate is logged and dropped
//! - Watched files are fixed when the watcher starts: a playlist file first
//!   referenced by a reloaded configuration is picked up after a restart

use std::path::{Path, PathBuf};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::InterceptorConfig;
use crate::dispatch::{Dispatcher, SharedDispatcher};

/// Watches the configuration file and its playlist files.
pub struct ConfigWatcher {
    config_path: PathBuf,
    playlist_paths: Vec<PathBuf>,
    updates: mpsc::UnboundedSender<InterceptorConfig>,
}

impl ConfigWatcher {
    /// Watch `config_path` and every playlist file `config` was loaded from.
    ///
    /// Returns the watcher and a receiver of reloaded configurations.
    pub fn new(
        config_path: &Path,
        config: &InterceptorConfig,
    ) -> (Self, mpsc::UnboundedReceiver<InterceptorConfig>) {
        let (updates, rx) = mpsc::unbounded_channel();

        let mut playlist_paths = config.content_paths();
        playlist_paths.sort();
        playlist_paths.dedup();

        let watcher = Self {
            config_path: config_path.to_path_buf(),
            playlist_paths,
            updates,
        };
        (watcher, rx)
    }

    /// Files whose changes trigger a reload.
    pub fn watched_paths(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.config_path.as_path())
            .chain(self.playlist_paths.iter().map(PathBuf::as_path))
    }

    /// Start watching. Dropping the returned watcher stops it.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let config_path = self.config_path.clone();
        let updates = self.updates.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| reload_on_change(res, &config_path, &updates),
            Config::default(),
        )?;

        for path in self.watched_paths() {
            watcher.watch(path, RecursiveMode::NonRecursive)?;
        }

        tracing::info!(
            config = %self.config_path.display(),
            playlist_files = self.playlist_paths.len(),
            "Config watcher started"
        );
        Ok(watcher)
    }
}

fn reload_on_change(
    res: notify::Result<Event>,
    config_path: &Path,
    updates: &mpsc::UnboundedSender<InterceptorConfig>,
) {
    let event = match res {
        Ok(event) => event,
        Err(e) => {
            tracing::error!(error = %e, "Watch error");
            return;
        }
    };
    if !(event.kind.is_modify() || event.kind.is_create()) {
        return;
    }

    tracing::info!(paths = ?event.paths, "Change detected, reloading configuration");
    match load_config(config_path) {
        Ok(config) => {
            if updates.send(config).is_err() {
                tracing::debug!("Reload receiver closed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Reload failed, keeping current configuration");
        }
    }
}

/// Publish every received configuration as a new dispatcher snapshot.
///
/// This is the single writer for `shared`. Returns when the sender side
/// is dropped.
pub async fn apply_updates(
    mut updates: mpsc::UnboundedReceiver<InterceptorConfig>,
    shared: SharedDispatcher,
) {
    while let Some(config) = updates.recv().await {
        match Dispatcher::from_config(&config) {
            Ok(dispatcher) => {
                tracing::info!(
                    marker = %config.interceptor.marker,
                    master_url = %config.master.url,
                    playlists = dispatcher.registry().len(),
                    "Applying reloaded configuration"
                );
                shared.store(dispatcher);
            }
            Err(e) => {
                tracing::error!(error = %e, "Reloaded configuration rejected");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::UrlCodec;
    use crate::registry::PlaylistRegistry;
    use std::fs;
    use std::time::Duration;

    fn config(master_url: &str) -> InterceptorConfig {
        let mut config = InterceptorConfig::default();
        config.master.url = master_url.to_string();
        config.master.content = Some("#EXTM3U\n".to_string());
        config
    }

    #[tokio::test]
    async fn test_apply_updates_swaps_snapshot() {
        let shared = SharedDispatcher::new(Dispatcher::new(
            UrlCodec::default(),
            PlaylistRegistry::new("https://a.example.com/master.m3u8", "#EXTM3U\n"),
        ));
        let (tx, rx) = mpsc::unbounded_channel();

        let mut bad = config("https://b.example.com/master.m3u8");
        bad.master.content = None;
        tx.send(bad).unwrap();
        tx.send(config("https://c.example.com/master.m3u8")).unwrap();
        drop(tx);

        apply_updates(rx, shared.clone()).await;

        assert_eq!(
            shared.load().registry().master_url(),
            "https://c.example.com/master.m3u8"
        );
    }

    #[test]
    fn test_watched_paths_include_playlist_files() {
        let mut config = config("https://a.example.com/master.m3u8");
        config.master.content_path = Some(PathBuf::from("/srv/master.m3u8"));
        config.playlists.push(crate::config::PlaylistConfig {
            name: "audio".into(),
            url: "https://a.example.com/audio.m3u8".into(),
            content: Some("#EXTM3U\n".into()),
            content_path: Some(PathBuf::from("/srv/master.m3u8")),
        });

        let (watcher, _rx) = ConfigWatcher::new(Path::new("/srv/interceptor.toml"), &config);
        let watched: Vec<&Path> = watcher.watched_paths().collect();
        assert_eq!(
            watched,
            vec![Path::new("/srv/interceptor.toml"), Path::new("/srv/master.m3u8")]
        );
    }

    #[tokio::test]
    async fn test_playlist_file_edit_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("interceptor.toml");
        fs::write(dir.path().join("master.m3u8"), "#EXTM3U\n").unwrap();
        fs::write(
            &config_path,
            "[master]\nurl = \"https://a.example.com/master.m3u8\"\ncontent_path = \"master.m3u8\"\n",
        )
        .unwrap();

        let loaded = load_config(&config_path).unwrap();
        let (watcher, mut updates) = ConfigWatcher::new(&config_path, &loaded);
        let _handle = watcher.run().unwrap();

        let edited = "#EXTM3U\n#EXT-X-VERSION:7\n";
        fs::write(dir.path().join("master.m3u8"), edited).unwrap();

        // A write may surface as several events; the first can see a truncated file.
        let reloaded = tokio::time::timeout(Duration::from_secs(10), async {
            while let Some(config) = updates.recv().await {
                if config.master.content.as_deref() == Some(edited) {
                    return true;
                }
            }
            false
        })
        .await;
        assert_eq!(reloaded, Ok(true));
    }
}
