//! Runtime-facing entry points
//!
//! The host runtime consumes listings through a coarse contract: a blocking
//! call returning the full record sequence, and a deferred equivalent that
//! delivers the same result through a channel. Errors cross this boundary
//! with a machine-readable code and a human-readable message wrapping the
//! original cause; everything below total failure has already been
//! recovered inside the inventory builder.

use crate::error::AppListError;
use crate::inventory::{ApplicationRecord, InventoryBuilder};
use std::sync::{Arc, mpsc};
use std::thread;
use thiserror::Error;
use tracing::warn;

/// Coarse error surfaced across the runtime boundary
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The registry refused enumeration at the permission layer
    #[error("Missing permission to query installed applications")]
    PermissionDenied,

    /// The application listing failed entirely
    #[error("Failed to get application list: {0}")]
    AppList(#[source] AppListError),

    /// The user-application listing failed entirely
    #[error("Failed to get user application list: {0}")]
    UserApps(#[source] AppListError),
}

impl BridgeError {
    /// Machine-readable error code for the runtime boundary
    pub fn code(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::AppList(_) => "GET_APP_LIST_ERROR",
            Self::UserApps(_) => "GET_USER_APPS_ERROR",
        }
    }
}

/// Get the full application list, system applications included
///
/// Blocking; returns the records sorted case-insensitively by name.
/// Partial host failures degrade completeness silently at this boundary —
/// only total failure surfaces as an error.
pub fn get_app_list(
    builder: &InventoryBuilder,
) -> std::result::Result<Vec<ApplicationRecord>, BridgeError> {
    match builder.list_applications(true) {
        Ok(inventory) => {
            if !inventory.is_complete() {
                warn!(
                    "Application list is incomplete: {} strategy failures, {} dropped entries",
                    inventory.strategy_failures.len(),
                    inventory.dropped_entries
                );
            }
            Ok(inventory.into_records())
        }
        Err(AppListError::PermissionDenied) => Err(BridgeError::PermissionDenied),
        Err(e) => Err(BridgeError::AppList(e)),
    }
}

/// Get the user-installed application list
///
/// Blocking; excludes system applications and additionally consults the
/// launch-intent fallback registry.
pub fn get_user_apps(
    builder: &InventoryBuilder,
) -> std::result::Result<Vec<ApplicationRecord>, BridgeError> {
    match builder.list_user_applications() {
        Ok(inventory) => {
            if !inventory.is_complete() {
                warn!(
                    "User application list is incomplete: {} strategy failures, {} dropped entries",
                    inventory.strategy_failures.len(),
                    inventory.dropped_entries
                );
            }
            Ok(inventory.into_records())
        }
        Err(AppListError::PermissionDenied) => Err(BridgeError::PermissionDenied),
        Err(e) => Err(BridgeError::UserApps(e)),
    }
}

/// Deferred equivalent of [`get_app_list`]
///
/// Runs the listing on a worker thread and delivers the result through the
/// returned receiver. The algorithm itself stays single-threaded; this is
/// only the non-blocking call shape the host runtime expects.
pub fn get_app_list_deferred(
    builder: Arc<InventoryBuilder>,
) -> mpsc::Receiver<std::result::Result<Vec<ApplicationRecord>, BridgeError>> {
    let (sender, receiver) = mpsc::sync_channel(1);
    thread::spawn(move || {
        // Receiver may have been dropped; nothing to do then
        let _ = sender.send(get_app_list(&builder));
    });
    receiver
}

/// Deferred equivalent of [`get_user_apps`]
pub fn get_user_apps_deferred(
    builder: Arc<InventoryBuilder>,
) -> mpsc::Receiver<std::result::Result<Vec<ApplicationRecord>, BridgeError>> {
    let (sender, receiver) = mpsc::sync_channel(1);
    thread::spawn(move || {
        let _ = sender.send(get_user_apps(&builder));
    });
    receiver
}

/// Whether the host has granted usage-statistics access
///
/// Soft-fail query: any registry error maps to `false`.
pub fn has_usage_stats_permission(builder: &InventoryBuilder) -> bool {
    builder
        .registry()
        .usage_access_granted()
        .unwrap_or_else(|e| {
            warn!("Usage access query failed: {}", e);
            false
        })
}
