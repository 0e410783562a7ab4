//! Configuration data models
//!
//! This module defines the data structures used for crate settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Crate settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Icon cache directory override; the platform cache directory is used
    /// when absent
    pub cache_dir: Option<PathBuf>,
    /// Edge length cached icons are resized to (16-512)
    pub icon_size: u32,
}

impl Settings {
    /// Effective icon cache directory
    pub fn effective_cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(crate::utils::IconCache::default_cache_dir)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_dir: None,
            icon_size: 64,
        }
    }
}
