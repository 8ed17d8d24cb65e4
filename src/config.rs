//!
//! This module defines the filter configuration, its TOML representation, and the upward discovery
//! of `.autolinker.toml` / `autolinker.toml` files.

use crate::policy::SchemeList;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File names searched for during discovery, in priority order
pub const CONFIG_FILES: &[&str] = &[".autolinker.toml", "autolinker.toml"];

/// Upper bound on parent directories visited during discovery
const MAX_DISCOVERY_DEPTH: usize = 100;

/// Link detection switches and display options for one filter invocation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct FilterSettings {
    /// Link absolute URLs that start with an allowed scheme
    pub with_protocol: bool,
    /// Link protocol-less `www.` addresses
    pub with_www: bool,
    /// Link email addresses
    pub with_mail: bool,
    /// Maximum number of characters shown inside a generated link (0 = unlimited)
    pub max_display_length: usize,
    /// Marker appended to truncated display text
    pub ellipsis: String,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            with_protocol: true,
            with_www: true,
            with_mail: true,
            max_display_length: 72,
            ellipsis: "…".to_string(),
        }
    }
}

impl FilterSettings {
    /// Settings with every link kind enabled and no truncation
    pub fn unlimited() -> Self {
        Self {
            max_display_length: 0,
            ..Self::default()
        }
    }

    /// Check if no link kind is enabled
    pub fn is_noop(&self) -> bool {
        !self.with_protocol && !self.with_www && !self.with_mail
    }
}

/// Represents the complete configuration loaded from autolinker.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Detection switches and display options
    pub filter: FilterSettings,
    /// Scheme allow-list used for absolute links
    pub policy: SchemeList,
}

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file at {path}: {source}")]
    IoError { source: io::Error, path: String },

    /// Failed to parse the configuration content
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    /// Failed to render the configuration as TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(String),
}

/// A configuration together with the file it was read from, if any
#[derive(Debug, Clone, Default)]
pub struct SourcedConfig {
    pub config: Config,
    pub source: Option<PathBuf>,
}

impl From<SourcedConfig> for Config {
    fn from(sourced: SourcedConfig) -> Self {
        sourced.config
    }
}

impl Config {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Read and parse a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            source,
            path: path.display().to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Render the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Search `start_dir` and its parents for a configuration file.
    ///
    /// The search stops at the first directory containing a `.git` entry (after checking that
    /// directory itself) or at the filesystem root.
    pub fn discover_config_upward(start_dir: &Path) -> Option<PathBuf> {
        let mut current_dir = start_dir.to_path_buf();
        let mut depth = 0;

        loop {
            if depth >= MAX_DISCOVERY_DEPTH {
                log::debug!("[autolinker-config] Maximum traversal depth reached");
                return None;
            }

            log::debug!("[autolinker-config] Searching for config in: {}", current_dir.display());

            for name in CONFIG_FILES {
                let candidate = current_dir.join(name);
                if candidate.is_file() {
                    log::debug!("[autolinker-config] Found config file: {}", candidate.display());
                    return Some(candidate);
                }
            }

            if current_dir.join(".git").exists() {
                log::debug!("[autolinker-config] Stopping at .git directory");
                return None;
            }

            if !current_dir.pop() {
                log::debug!("[autolinker-config] Reached filesystem root");
                return None;
            }
            depth += 1;
        }
    }

    /// Load an explicit configuration file, or discover one from `start_dir` upward.
    ///
    /// An explicit path that cannot be read is an error; failing to discover a file is not, and
    /// yields the defaults.
    pub fn load_with_discovery(
        config_path: Option<&Path>,
        start_dir: &Path,
        skip_auto_discovery: bool,
    ) -> Result<SourcedConfig, ConfigError> {
        if let Some(path) = config_path {
            log::debug!("[autolinker-config] Explicit config_path provided: {}", path.display());
            return Ok(SourcedConfig {
                config: Self::load(path)?,
                source: Some(path.to_path_buf()),
            });
        }

        if skip_auto_discovery {
            log::debug!("[autolinker-config] Skipping auto-discovery due to --no-config flag");
            return Ok(SourcedConfig::default());
        }

        match Self::discover_config_upward(start_dir) {
            Some(path) => Ok(SourcedConfig {
                config: Self::load(&path)?,
                source: Some(path),
            }),
            None => {
                log::debug!("[autolinker-config] No configuration file found, using defaults");
                Ok(SourcedConfig::default())
            }
        }
    }
}
