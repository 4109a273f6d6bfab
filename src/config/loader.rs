//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::{InterceptorConfig, PlaylistConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Cannot read playlist '{name}' from {}: {source}", .path.display())]
    Playlist {
        name: String,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
///
/// Playlist `content_path`s are resolved relative to the file's directory
/// and read into `content`; `content_path` keeps the resolved path.
pub fn load_config(path: &Path) -> Result<InterceptorConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_config(&content, base_dir)
}

/// Parse, validate and resolve configuration text.
pub fn parse_config(content: &str, base_dir: &Path) -> Result<InterceptorConfig, ConfigError> {
    let mut config: InterceptorConfig = toml::from_str(content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    resolve_content(&mut config.master, crate::registry::MASTER_NAME, base_dir)?;
    for playlist in &mut config.playlists {
        let name = playlist.name.clone();
        resolve_content(playlist, &name, base_dir)?;
    }

    Ok(config)
}

fn resolve_content(
    playlist: &mut PlaylistConfig,
    name: &str,
    base_dir: &Path,
) -> Result<(), ConfigError> {
    let Some(relative) = playlist.content_path.as_ref() else {
        return Ok(());
    };

    let path = base_dir.join(relative);
    let text = fs::read_to_string(&path).map_err(|source| ConfigError::Playlist {
        name: name.to_string(),
        path: path.clone(),
        source,
    })?;

    tracing::debug!(playlist = %name, path = %path.display(), bytes = text.len(), "Loaded playlist file");
    playlist.content = Some(text);
    playlist.content_path = Some(path);
    Ok(())
}
