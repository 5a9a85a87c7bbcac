use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure for gitsafe
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Color scheme configuration
    pub colors: Colors,
    /// General application settings
    pub settings: Settings,
}

/// Color configuration for various UI elements
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Colors {
    /// Successful operations
    pub success: String,
    /// Failed operations and the destructive dialogs
    pub error: String,
    /// Warnings and pending confirmations
    pub warning: String,
    /// Section headings and the active tab
    pub accent: String,
    /// Hints and placeholders
    pub muted: String,
    /// Focused form field
    pub selected: String,
    /// Status bar
    pub status_bar: String,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Remote used for pushing and deleting tags
    pub remote: String,
    /// Initial destination on the clone page; home directory when unset
    pub clone_dir: Option<PathBuf>,
    /// Event poll interval in milliseconds
    pub tick_rate_ms: u64,
    /// Log file; `<data dir>/gitsafe/gitsafe.log` when unset
    pub log_file: Option<PathBuf>,
}

impl Default for Colors {
    fn default() -> Self {
        Colors {
            success: "green".to_string(),
            error: "red".to_string(),
            warning: "yellow".to_string(),
            accent: "cyan".to_string(),
            muted: "dark gray".to_string(),
            selected: "black on white".to_string(),
            status_bar: "white on dark gray".to_string(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            remote: "origin".to_string(),
            clone_dir: None,
            tick_rate_ms: 100,
            log_file: None,
        }
    }
}

impl Settings {
    /// Destination offered on the clone page
    pub fn clone_dir(&self) -> PathBuf {
        self.clone_dir
            .clone()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Where tracing output goes
    pub fn log_file(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("gitsafe")
                .join("gitsafe.log")
        })
    }
}

impl Config {
    /// Get the default configuration file path
    /// Returns ~/.config/gitsafe/config.yaml on Unix-like systems
    /// Returns %APPDATA%\gitsafe\config.yaml on Windows
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("gitsafe");

        Ok(config_dir.join("config.yaml"))
    }

    /// Load configuration from a YAML file
    /// If the file doesn't exist, returns the default configuration
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from the default path, writing the defaults there
    /// on first start so the file can be edited
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_or_create(&path)
    }

    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from_file(path);
        }
        let config = Config::default();
        config.save_to_file(path)?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let yaml = serde_yaml::to_string(self).context("Failed to serialize configuration")?;

        fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}
