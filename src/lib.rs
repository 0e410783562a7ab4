//! `applist` - Installed-application inventory with icon caching
//!
//! Enumerates installed applications through multiple overlapping registry
//! queries, merges the results by identifier (first-discovered-wins),
//! classifies each entry as system or user application, caches one icon
//! file per application on disk, and returns a deterministically ordered
//! list. The host application registry is an injected collaborator behind
//! the [`registry::PackageRegistry`] trait; a freedesktop backend ships for
//! Unix hosts.
//!
//! # Failure model
//!
//! Listings are best-effort unions: per-entry and per-strategy failures are
//! recovered locally and reported through [`inventory::Inventory`], and
//! only total failure (every strategy failed) surfaces as an error.

// Module declarations
pub mod bridge;
pub mod config;
pub mod error;
pub mod inventory;
pub mod registry;
pub mod utils;

// Re-export commonly used types
pub use bridge::BridgeError;
pub use error::{AppListError, Result};
pub use inventory::{ApplicationRecord, Inventory, InventoryBuilder};
pub use registry::PackageRegistry;
pub use utils::IconCache;
