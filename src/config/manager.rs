//! Configuration manager for loading and saving settings
//!
//! This module provides functionality to load and save settings to
//! `<platform config dir>/applist/config.json` with atomic writes to
//! prevent corruption.

use crate::config::models::Settings;
use crate::error::{AppListError, Result, StringError};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration manager
pub struct ConfigManager;

impl ConfigManager {
    /// Get the path to the configuration file
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("applist")
            .join("config.json")
    }

    /// Load settings from the default location
    ///
    /// If the file doesn't exist or is corrupt, returns default settings.
    pub fn load() -> Result<Settings> {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from an explicit path
    pub fn load_from(path: &Path) -> Result<Settings> {
        if !path.exists() {
            info!("Configuration file not found, using defaults");
            return Ok(Settings::default());
        }

        let json = std::fs::read_to_string(path)?;

        match serde_json::from_str(&json) {
            Ok(settings) => {
                info!("Configuration loaded successfully");
                Ok(settings)
            }
            Err(e) => {
                warn!("Failed to parse configuration, using defaults: {}", e);
                Ok(Settings::default())
            }
        }
    }

    /// Save settings to the default location with an atomic write
    pub fn save(settings: &Settings) -> Result<()> {
        Self::save_to(settings, &Self::config_path())
    }

    /// Save settings to an explicit path with an atomic write
    ///
    /// Uses a temporary file and rename to ensure the file on disk is
    /// always either the old or the new content.
    pub fn save_to(settings: &Settings, path: &Path) -> Result<()> {
        let config_dir = path
            .parent()
            .ok_or_else(|| AppListError::ConfigError(StringError::new("Invalid config path")))?;
        std::fs::create_dir_all(config_dir)?;

        // Atomic write: write to temp file, then rename
        let json = serde_json::to_string_pretty(settings)?;
        let tmp = tempfile::NamedTempFile::new_in(config_dir)?;
        std::fs::write(tmp.path(), json)?;
        tmp.persist(path)
            .map_err(|e| AppListError::ConfigError(Box::new(e)))?;

        info!("Configuration saved successfully");
        Ok(())
    }
}
