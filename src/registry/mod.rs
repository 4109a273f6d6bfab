//! In-memory playlist registry.
//!
//! # Responsibilities
//! - Hold inline playlist content keyed by canonical URL
//! - Designate exactly one entry as the master playlist
//! - Answer exact-match lookups
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Lookup is exact string match; no URL normalization
//! - Reload builds a new registry instead of mutating this one

use bytes::Bytes;
use std::collections::HashMap;

use crate::config::schema::InterceptorConfig;

/// Name given to the master entry.
pub const MASTER_NAME: &str = "master";

/// Errors raised while assembling a registry.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("playlist url '{url}' is registered twice ('{existing}' and '{duplicate}')")]
    DuplicateUrl {
        url: String,
        existing: String,
        duplicate: String,
    },
    #[error("playlist '{name}' has no content")]
    MissingContent { name: String },
}

/// A playlist served inline instead of being fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub name: String,
    pub content: Bytes,
    pub is_master: bool,
}

/// Canonical URL → inline playlist.
#[derive(Debug, Clone)]
pub struct PlaylistRegistry {
    master_url: String,
    entries: HashMap<String, PlaylistEntry>,
}

impl PlaylistRegistry {
    /// Create a registry holding only the master playlist.
    pub fn new(master_url: impl Into<String>, master_content: impl Into<Bytes>) -> Self {
        let master_url = master_url.into();
        let mut entries = HashMap::new();
        entries.insert(
            master_url.clone(),
            PlaylistEntry {
                name: MASTER_NAME.to_string(),
                content: master_content.into(),
                is_master: true,
            },
        );
        Self { master_url, entries }
    }

    /// Register an additional inline playlist.
    pub fn with_entry(
        mut self,
        name: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Result<Self, RegistryError> {
        let name = name.into();
        let url = url.into();
        if let Some(existing) = self.entries.get(&url) {
            return Err(RegistryError::DuplicateUrl {
                existing: existing.name.clone(),
                duplicate: name,
                url,
            });
        }
        self.entries.insert(
            url,
            PlaylistEntry {
                name,
                content: content.into(),
                is_master: false,
            },
        );
        Ok(self)
    }

    /// Build from a loaded configuration.
    ///
    /// Playlist files must already be resolved into `content` (the loader
    /// does this).
    pub fn from_config(config: &InterceptorConfig) -> Result<Self, RegistryError> {
        let master_content = config
            .master
            .content
            .clone()
            .ok_or_else(|| RegistryError::MissingContent {
                name: MASTER_NAME.to_string(),
            })?;

        let mut registry = Self::new(config.master.url.clone(), master_content);
        for playlist in &config.playlists {
            let content = playlist
                .content
                .clone()
                .ok_or_else(|| RegistryError::MissingContent {
                    name: playlist.name.clone(),
                })?;
            registry = registry.with_entry(playlist.name.clone(), playlist.url.clone(), content)?;
        }
        Ok(registry)
    }

    /// Look up the inline playlist registered for `canonical_url`.
    pub fn lookup(&self, canonical_url: &str) -> Option<&PlaylistEntry> {
        self.entries.get(canonical_url)
    }

    /// URL of the master playlist.
    pub fn master_url(&self) -> &str {
        &self.master_url
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(url, entry)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PlaylistEntry)> {
        self.entries.iter().map(|(url, entry)| (url.as_str(), entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER: &str = "https://cdn.example.com/master.m3u8";

    #[test]
    fn test_master_lookup() {
        let registry = PlaylistRegistry::new(MASTER, "#EXTM3U\n");
        let entry = registry.lookup(MASTER).unwrap();
        assert!(entry.is_master);
        assert_eq!(entry.name, MASTER_NAME);
        assert_eq!(entry.content, Bytes::from_static(b"#EXTM3U\n"));
        assert_eq!(registry.master_url(), MASTER);
    }

    #[test]
    fn test_lookup_is_exact() {
        let registry = PlaylistRegistry::new(MASTER, "#EXTM3U\n");
        assert!(registry.lookup("https://cdn.example.com/master.m3u8/").is_none());
        assert!(registry.lookup("HTTPS://cdn.example.com/master.m3u8").is_none());
        assert!(registry.lookup("").is_none());
    }

    #[test]
    fn test_additional_entries() {
        let registry = PlaylistRegistry::new(MASTER, "#EXTM3U\n")
            .with_entry("audio", "https://cdn.example.com/audio.m3u8", "#EXTM3U\n#AUDIO\n")
            .unwrap();

        assert_eq!(registry.len(), 2);
        let audio = registry.lookup("https://cdn.example.com/audio.m3u8").unwrap();
        assert!(!audio.is_master);
        assert_eq!(audio.name, "audio");
        assert_eq!(registry.iter().filter(|(_, e)| e.is_master).count(), 1);
    }

    #[test]
    fn test_duplicate_url_rejected() {
        let err = PlaylistRegistry::new(MASTER, "#EXTM3U\n")
            .with_entry("copy", MASTER, "other")
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateUrl {
                url: MASTER.to_string(),
                existing: MASTER_NAME.to_string(),
                duplicate: "copy".to_string(),
            }
        );
    }
}
