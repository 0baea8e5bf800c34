//! Configuration management for swiss.
//!
//! Loads configuration from ${SWISS_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Returns the default config template (with comments).
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for swiss configuration and log files.
    //!
    //! SWISS_HOME resolution order:
    //! 1. SWISS_HOME environment variable (if set)
    //! 2. ~/.config/swiss (default)
    //! 3. ./.swiss when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the swiss home directory.
    pub fn swiss_home() -> PathBuf {
        if let Ok(home) = std::env::var("SWISS_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".swiss"),
            |h| h.join(".config").join("swiss"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        swiss_home().join("config.toml")
    }

    /// Returns the default log file path.
    pub fn log_path() -> PathBuf {
        swiss_home().join("swiss.log")
    }
}

/// Player search (autocomplete) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompleteConfig {
    /// Minimum term length before a search is issued.
    pub min_length: usize,
    /// Maximum number of suggestions kept per query.
    pub max_results: usize,
}

impl Default for CompleteConfig {
    fn default() -> Self {
        Self {
            min_length: 3,
            max_results: 8,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Level filter directive (e.g. "info", "`swiss_tui=debug`").
    pub level: String,
    /// Log file; `None` means `paths::log_path()`.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LogConfig {
    pub fn file_path(&self) -> PathBuf {
        self.file.clone().unwrap_or_else(paths::log_path)
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Standings rows per page
    pub players_per_page: usize,

    /// Player search settings
    #[serde(default)]
    pub complete: CompleteConfig,

    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    const DEFAULT_PLAYERS_PER_PAGE: usize = 10;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a config file with the commented default template.
    ///
    /// Fails if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        if self.players_per_page == 0 {
            anyhow::bail!("players_per_page must be at least 1");
        }
        if self.complete.max_results == 0 {
            anyhow::bail!("complete.max_results must be at least 1");
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            players_per_page: Self::DEFAULT_PLAYERS_PER_PAGE,
            complete: CompleteConfig::default(),
            log: LogConfig::default(),
        }
    }
}
