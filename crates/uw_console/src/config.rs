//! Console configuration
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables: `UWINV_SAVE_DIR`, `UWINV_DEBUG`
//! 2. Config file named by `UWINV_CONFIG`
//! 3. Config file `uwinv.toml` in the working directory
//! 4. Built-in defaults
//!
//! # Example Config File
//!
//! ```toml
//! save_dir = "saves"
//! properties = "data/properties.toml"
//! combine_rules = "data/cmb.dat"
//! player_name = "Avatar"
//! initial_pool_size = 256
//! debug = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use uw_inventory::InventoryConfig;

/// Default config file name
pub const CONFIG_FILE: &str = "uwinv.toml";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Console configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Folder holding the savegames
    pub save_dir: PathBuf,
    /// Object property table (TOML)
    pub properties: Option<PathBuf>,
    /// Combine rule table (6-byte records)
    pub combine_rules: Option<PathBuf>,
    /// Player name stored in savegame headers
    pub player_name: String,
    /// Number of pool records a new inventory starts with
    pub initial_pool_size: usize,
    /// Enable debug logging
    pub debug: bool,
    /// Config file this was loaded from
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from("saves"),
            properties: None,
            combine_rules: None,
            player_name: "Avatar".to_string(),
            initial_pool_size: InventoryConfig::default().initial_pool_size,
            debug: false,
            config_path: None,
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from all sources
    ///
    /// A missing default config file is not an error; a config file named
    /// by `UWINV_CONFIG` must exist.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os("UWINV_CONFIG") {
            Some(path) => Self::load_from_file(Path::new(&path))?,
            None if Path::new(CONFIG_FILE).exists() => Self::load_from_file(Path::new(CONFIG_FILE))?,
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Override settings from environment variables
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var("UWINV_SAVE_DIR").filter(|dir| !dir.is_empty()) {
            self.save_dir = PathBuf::from(dir);
        }

        if let Some(debug) = var("UWINV_DEBUG") {
            self.debug = debug.is_empty() || debug == "1" || debug == "true";
        }
    }

    /// Inventory settings
    pub fn inventory(&self) -> InventoryConfig {
        InventoryConfig {
            initial_pool_size: self.initial_pool_size,
        }
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        log::info!("Console Configuration:");
        log::info!("  Save dir: {}", self.save_dir.display());
        if let Some(path) = &self.properties {
            log::info!("  Properties: {}", path.display());
        }
        if let Some(path) = &self.combine_rules {
            log::info!("  Combine rules: {}", path.display());
        }
        log::info!("  Pool size: {}", self.initial_pool_size);
        if let Some(path) = &self.config_path {
            log::info!("  Config: {}", path.display());
        }
    }
}
