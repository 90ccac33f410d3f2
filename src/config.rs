use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::feed::types::PackageSource;

// =============================================================================
// Search-related constants
// =============================================================================

/// Timeout for reading and parsing a single archive in milliseconds (30 seconds)
pub const ARCHIVE_TIMEOUT_MS: u64 = 30_000;

/// Number of archives read concurrently during one search
pub const MAX_CONCURRENT_READS: usize = 16;

/// Errors raised while loading the configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Feed configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FeedConfig {
    pub sources: Vec<PackageSource>,
    pub search: SearchConfig,
}

/// Search-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchConfig {
    /// Per-archive timeout in milliseconds
    pub archive_timeout_ms: u64,
    /// Upper bound on concurrently processed archives
    pub max_concurrent_reads: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            archive_timeout_ms: ARCHIVE_TIMEOUT_MS,
            max_concurrent_reads: MAX_CONCURRENT_READS,
        }
    }
}

impl FeedConfig {
    /// Loads the configuration from a JSON file.
    /// A missing file yields the default configuration.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Finds a configured source by id or display name
    pub fn find_source(&self, name: &str) -> Option<&PackageSource> {
        self.sources
            .iter()
            .find(|source| source.id == name || source.source_name == name)
    }
}

/// Returns the path to the data directory for nuget-feed.
/// Uses $XDG_DATA_HOME/nuget-feed if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/nuget-feed,
/// or ./nuget-feed if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the configuration file.
pub fn config_path() -> PathBuf {
    data_dir().join("config.json")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("nuget-feed")
}
