//! src/config.rs
//! ============================================================================
//! # Config: Explorer Configuration Loader and Saver
//!
//! Loads and saves settings as TOML from the platform config directory
//! resolved by the [`directories`](https://docs.rs/directories) crate.
//!
//! ## Example
//! ```rust,ignore
//! let config = Config::load()?;
//! config.save()?;
//! ```

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::AppError,
    logging::LoggerConfig,
    model::{id_gen::DEFAULT_ID_LENGTH, node::DEFAULT_LANGUAGE},
};

/// Settings for the tree and its interaction state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Length of generated node ids
    pub id_length: usize,

    /// Language for new files whose name has no extension
    pub default_language: CompactString,

    /// JSON seed tree; the built-in seed is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_path: Option<PathBuf>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            id_length: DEFAULT_ID_LENGTH,
            default_language: CompactString::const_new(DEFAULT_LANGUAGE),
            seed_path: None,
        }
    }
}

/// Main configuration struct for the application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub explorer: ExplorerConfig,

    #[serde(default)]
    pub logging: LoggerConfig,
}

impl Config {
    /// Loads config from the app config dir, creating a default file when
    /// none exists yet.
    pub fn load() -> Result<Self, AppError> {
        let path = Self::config_path()?;

        if path.exists() {
            info!("Loading config from {}", path.display());
            Self::load_from_file(&path)
        } else {
            info!(
                "No config file found at {}, using default configuration. Creating it now.",
                path.display()
            );

            let default_config = Self::default();
            default_config.save_to_file(&path)?;

            Ok(default_config)
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path).map_err(|e| AppError::config_io(path, e))?;
        let cfg: Self = toml::from_str(&text)?;
        cfg.validate()?;

        Ok(cfg)
    }

    /// Saves config to the app config dir.
    pub fn save(&self) -> Result<(), AppError> {
        self.save_to_file(&Self::config_path()?)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), AppError> {
        info!("Saving config to {}", path.display());

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::config_io(parent, e))?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str).map_err(|e| AppError::config_io(path, e))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.explorer.id_length == 0 {
            return Err(AppError::InvalidConfig(CompactString::const_new(
                "explorer.id_length must be greater than 0",
            )));
        }

        if self.explorer.default_language.trim().is_empty() {
            return Err(AppError::InvalidConfig(CompactString::const_new(
                "explorer.default_language must not be empty",
            )));
        }

        Ok(())
    }

    /// Returns the canonical config file path.
    pub fn config_path() -> Result<PathBuf, AppError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn config_dir() -> Result<PathBuf, AppError> {
        let proj_dirs = ProjectDirs::from("org", "example", "Explorer")
            .ok_or_else(|| AppError::Other("Could not determine config directory.".into()))?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }
}
