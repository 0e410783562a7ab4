//! `applist` - Installed-application inventory CLI
//!
//! Thin front end over the library: wires logging, settings, the platform
//! registry backend and the icon cache together, runs a listing and prints
//! the records as JSON.

use anyhow::{Context, Result};
use applist::config::ConfigManager;
use applist::registry::PackageRegistry;
use applist::utils::{self, IconCache};
use applist::{InventoryBuilder, bridge};
use std::sync::Arc;
use tracing::info;

/// Main entry point
///
/// Usage: `applist [--user] [--pretty]`
///
/// `--user` lists user-installed applications only (with the launch-intent
/// fallback); the default lists everything, system applications included.
fn main() -> Result<()> {
    utils::init_logging().context("Failed to initialize logging system")?;

    let mut user_only = false;
    let mut pretty = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--user" => user_only = true,
            "--pretty" => pretty = true,
            "--help" | "-h" => {
                println!("Usage: applist [--user] [--pretty]");
                return Ok(());
            }
            other => {
                anyhow::bail!("Unknown argument: {other} (try --help)");
            }
        }
    }

    let settings = ConfigManager::load().context("Failed to load configuration")?;
    let cache = IconCache::new(settings.effective_cache_dir(), settings.icon_size)
        .context("Failed to create icon cache")?;
    let registry = build_registry()?;
    let builder = InventoryBuilder::new(registry, cache);

    let result = if user_only {
        bridge::get_user_apps(&builder)
    } else {
        bridge::get_app_list(&builder)
    };

    let records = match result {
        Ok(records) => records,
        Err(e) => anyhow::bail!("{}: {e}", e.code()),
    };

    info!("Listed {} applications", records.len());

    let json = if pretty {
        serde_json::to_string_pretty(&records)?
    } else {
        serde_json::to_string(&records)?
    };
    println!("{json}");

    Ok(())
}

#[cfg(unix)]
fn build_registry() -> Result<Arc<dyn PackageRegistry>> {
    Ok(Arc::new(applist::registry::DesktopRegistry::new()))
}

#[cfg(not(unix))]
fn build_registry() -> Result<Arc<dyn PackageRegistry>> {
    anyhow::bail!("No application registry backend for this platform")
}
