//! Configuration management for Pedigree.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `pedigree.toml` file
//! 3. User config `~/.config/pedigree/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::layout::LayoutConfig;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hosted record store connection.
    pub store: StoreConfig,

    /// Ancestry resolution settings.
    pub lineage: LineageConfig,

    /// Tree layout spacing and zoom bounds.
    pub tree: LayoutConfig,

    /// Share link settings.
    pub share: ShareConfig,

    /// Local web viewer settings.
    pub server: ServerConfig,

    /// Logging settings.
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./pedigree.toml` (project local)
    /// 2. `~/.config/pedigree/config.toml` (user config)
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::from_file(DEFAULT_CONFIG_FILE);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(APP_DIR_NAME).join(USER_CONFIG_FILE);
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Store overrides
        if let Some(url) = lookup("PEDIGREE_STORE_URL") {
            self.store.url = Some(url);
        }
        if let Some(key) = lookup("PEDIGREE_STORE_KEY") {
            self.store.api_key = Some(key);
        }
        if let Some(table) = lookup("PEDIGREE_STORE_TABLE") {
            self.store.table = table;
        }
        if let Some(bucket) = lookup("PEDIGREE_STORE_BUCKET") {
            self.store.bucket = bucket;
        }

        // Lineage overrides
        if let Some(depth) = lookup("PEDIGREE_MAX_DEPTH") {
            if let Ok(n) = depth.parse() {
                self.lineage.max_depth = n;
            }
        }

        // Share overrides
        if let Some(origin) = lookup("PEDIGREE_SHARE_ORIGIN") {
            self.share.origin = origin;
        }

        // Log overrides
        if let Some(level) = lookup("PEDIGREE_LOG") {
            self.log.level = level;
        }
    }

    /// Reject values the rest of the crate cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lineage.max_depth == 0 {
            return Err(ConfigError::Invalid(
                "lineage.max_depth must be at least 1".to_string(),
            ));
        }
        let finite = self.tree.min_scale.is_finite() && self.tree.max_scale.is_finite();
        if !finite || self.tree.min_scale <= 0.0 || self.tree.min_scale > self.tree.max_scale {
            return Err(ConfigError::Invalid(format!(
                "tree scale range [{}, {}] is not valid",
                self.tree.min_scale, self.tree.max_scale
            )));
        }
        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Hosted record store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Project URL of the hosted backend, e.g. `https://xyz.supabase.co`.
    pub url: Option<String>,

    /// API key (can also be set via `PEDIGREE_STORE_KEY`).
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Table holding horse records.
    pub table: String,

    /// Bucket holding photos.
    pub bucket: String,

    /// Folder inside the bucket for new uploads.
    pub photo_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            table: DEFAULT_STORE_TABLE.to_string(),
            bucket: DEFAULT_STORE_BUCKET.to_string(),
            photo_prefix: DEFAULT_PHOTO_PREFIX.to_string(),
        }
    }
}

/// Ancestry resolution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LineageConfig {
    /// Generations shown in a tree, root included.
    pub max_depth: usize,
}

impl Default for LineageConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Share link configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    /// Origin placed in front of `/?id=...&shared=true`.
    pub origin: String,

    /// Seconds before a notice is dismissed.
    pub notice_seconds: u64,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_SHARE_ORIGIN.to_string(),
            notice_seconds: DEFAULT_NOTICE_SECONDS,
        }
    }
}

impl ShareConfig {
    pub fn notice_ttl(&self) -> Duration {
        Duration::from_secs(self.notice_seconds)
    }
}

/// Web viewer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,

    /// Whether to open the browser automatically.
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_SERVER_PORT,
            open_browser: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive, e.g. `info` or `pedigree_core=debug`.
    pub level: String,

    /// Log file for the terminal UI. Defaults to the user data directory.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

impl LogConfig {
    /// Resolve where the terminal UI writes its log.
    pub fn file_path(&self) -> PathBuf {
        if let Some(file) = &self.file {
            return file.clone();
        }
        dirs::data_local_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join(DEFAULT_LOG_FILE))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.store.table, DEFAULT_STORE_TABLE);
        assert_eq!(config.lineage.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.share.origin, DEFAULT_SHARE_ORIGIN);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[store]"));
        assert!(toml_str.contains("[lineage]"));
        assert!(toml_str.contains("[tree]"));
        assert!(toml_str.contains("[share]"));
    }

    #[test]
    fn test_api_key_not_serialized() {
        let mut config = Config::default();
        config.store.api_key = Some("secret-key".to_string());
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(!toml_str.contains("secret-key"));
    }

    #[test]
    fn test_zero_depth_rejected() {
        let mut config = Config::default();
        config.lineage.max_depth = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
