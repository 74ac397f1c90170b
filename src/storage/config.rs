//! Configuration handling
//!
//! Configuration is read from `~/.config/curriculum/config.toml` (global)
//! and `./curriculum.toml` (local). A local file replaces the global one as
//! a whole; every key is optional.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ingest::ParseOptions;

/// File name of the local configuration
pub const LOCAL_CONFIG_FILE: &str = "curriculum.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Where course documents are read from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourceConfig {
    /// Directory holding `view/{id}.html` and `prerequisito/{id}.html`
    pub documents_dir: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            documents_dir: PathBuf::from("pages"),
        }
    }
}

/// Tool configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Default output format (text or json)
    pub default_format: OutputFormat,

    /// Default student profile path
    pub profile: PathBuf,

    /// Curriculum table parsing
    pub parse: ParseOptions,

    /// Course document source
    pub source: SourceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_format: OutputFormat::Text,
            profile: PathBuf::from("profile.json"),
            parse: ParseOptions::default(),
            source: SourceConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the current directory, then the global location
    pub fn load() -> Result<Self> {
        let local = Path::new(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Self::from_file(local);
        }

        match Self::global_config_dir() {
            Some(dir) if dir.join("config.toml").is_file() => {
                Self::from_file(&dir.join("config.toml"))
            }
            _ => Ok(Self::default()),
        }
    }

    /// Loads configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "curriculum", "curriculum").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Writes this configuration as TOML
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))
    }
}
