//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\songgrab\config.toml
//! - macOS: ~/Library/Application Support/songgrab/config.toml
//! - Linux: ~/.config/songgrab/config.toml
//!
//! The config file is human-readable and editable. Settings are loaded at
//! startup; CLI flags override individual values per run. The matching and
//! network sections are threaded into the resolver as an explicit immutable
//! [`ResolveConfig`] - there are no process-wide mutable defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::resolver::{MatchConfig, ResolveConfig};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Matching strictness
    pub matching: MatchingConfig,

    /// Provider network behavior
    pub network: NetworkConfig,

    /// Download destination and format
    pub downloads: DownloadsConfig,
}

/// Matching strictness settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum acceptance score for title+artist queries (0.0 - 1.0)
    pub min_score: f32,

    /// Minimum acceptance score for title-only queries (0.0 - 1.0)
    pub title_only_min_score: f32,

    /// Candidates requested from each provider
    pub max_results: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        let defaults = MatchConfig::default();
        Self {
            min_score: defaults.min_score,
            title_only_min_score: defaults.title_only_min_score,
            max_results: 20,
        }
    }
}

/// Provider network settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Independent timeout for each provider call, in milliseconds
    pub per_provider_timeout_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            per_provider_timeout_ms: 10_000,
        }
    }
}

/// Download settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadsConfig {
    /// Destination directory (current directory when unset)
    pub directory: Option<PathBuf>,

    /// Audio format passed to the downloader
    pub audio_format: String,

    /// Write a .lrc sidecar next to the audio file when lyrics are found
    pub write_lrc_sidecar: bool,
}

impl Default for DownloadsConfig {
    fn default() -> Self {
        Self {
            directory: None,
            audio_format: "mp3".to_string(),
            write_lrc_sidecar: true,
        }
    }
}

impl Config {
    /// Build the resolver configuration from this config.
    pub fn resolve_config(&self) -> ResolveConfig {
        ResolveConfig {
            matching: MatchConfig {
                min_score: self.matching.min_score,
                title_only_min_score: self.matching.title_only_min_score,
            },
            per_provider_timeout: Duration::from_millis(self.network.per_provider_timeout_ms),
            max_results: self.matching.max_results,
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("songgrab"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to disk
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    let path = dir.join("config.toml");

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::CreateDir(dir.clone(), e))?;

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, &path)
        .map_err(|e| ConfigError::Rename(temp_path, path.clone(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
