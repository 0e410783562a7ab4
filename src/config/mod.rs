//! Configuration management module
//!
//! This module handles loading, saving, and managing crate settings.
//! Settings are stored as JSON under the platform config directory with
//! atomic writes to prevent corruption.

pub mod manager;
pub mod models;

pub use manager::ConfigManager;
pub use models::Settings;
