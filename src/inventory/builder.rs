//! Application inventory builder
//!
//! Implements the merge-by-first-match union over the enumeration
//! strategies: each strategy's descriptors are folded into an
//! identifier-keyed map with insert-if-absent semantics, entries are
//! classified and resolved, and the surviving records are returned sorted
//! case-insensitively by display name.
//!
//! # Failure recovery
//!
//! Failures are recovered as locally as possible:
//!
//! - a per-entry failure (label resolution) drops that entry only, counted
//!   in [`Inventory::dropped_entries`];
//! - a per-strategy failure is recorded in
//!   [`Inventory::strategy_failures`] and the remaining strategies still
//!   run;
//! - only when *every* strategy fails does the call surface an error —
//!   [`AppListError::PermissionDenied`] if any strategy was denied,
//!   otherwise [`AppListError::TotalFailure`].
//!
//! Icon extraction is softer still: it can only ever produce an absent
//! `icon_path`, never drop an entry.

use crate::error::{AppListError, Result, StringError};
use crate::inventory::strategy::{Strategy, strategy_plan};
use crate::registry::{AppDescriptor, PackageRegistry, RegistryError};
use crate::utils::icon_cache::IconCache;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// One application in a listing result
///
/// Serialized with camelCase keys because this record crosses the runtime
/// boundary as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    /// Human-readable display name (locale-dependent)
    pub name: String,
    /// Reverse-domain package identifier, unique within a result set
    pub identifier: String,
    /// Path to the cached icon file, absent if extraction failed
    pub icon_path: Option<PathBuf>,
    /// Whether the application classifies as a system application
    pub is_system_app: bool,
}

/// A recorded per-strategy failure
#[derive(Debug)]
pub struct StrategyFailure {
    /// Description of the strategy that failed
    pub strategy: String,
    /// The error the registry returned
    pub error: RegistryError,
}

/// Result of a listing call: the records plus what was omitted
///
/// A listing is a best-effort union, not a transactional fetch. Partial
/// host failures degrade completeness instead of aborting the call, and
/// this type makes the degradation observable instead of swallowing it.
#[derive(Debug, Default)]
pub struct Inventory {
    /// Surviving records, sorted case-insensitively by name
    pub records: Vec<ApplicationRecord>,
    /// Strategies that failed and were skipped
    pub strategy_failures: Vec<StrategyFailure>,
    /// Entries dropped because their metadata could not be resolved
    pub dropped_entries: usize,
}

impl Inventory {
    /// Whether every strategy ran and every discovered entry was resolved
    pub fn is_complete(&self) -> bool {
        self.strategy_failures.is_empty() && self.dropped_entries == 0
    }

    /// Consume the inventory, keeping only the records
    pub fn into_records(self) -> Vec<ApplicationRecord> {
        self.records
    }
}

/// Builds application inventories from an injected registry
///
/// Holds the registry collaborator and the icon cache. The builder itself
/// is stateless between calls; concurrent calls are not coordinated beyond
/// what the cache's whole-file writes provide.
pub struct InventoryBuilder {
    registry: Arc<dyn PackageRegistry>,
    icons: IconCache,
}

impl InventoryBuilder {
    /// Create a builder over a registry and an icon cache
    pub fn new(registry: Arc<dyn PackageRegistry>, icons: IconCache) -> Self {
        Self { registry, icons }
    }

    /// The registry this builder queries
    pub fn registry(&self) -> &Arc<dyn PackageRegistry> {
        &self.registry
    }

    /// List installed applications
    ///
    /// Runs every enumeration strategy the registry's capabilities allow
    /// and merges the results. With `include_system = false`, system
    /// applications are filtered out before resolution.
    pub fn list_applications(&self, include_system: bool) -> Result<Inventory> {
        let plan = strategy_plan(self.registry.capabilities(), false);
        self.run_plan(&plan, include_system)
    }

    /// List user-installed applications
    ///
    /// Equivalent to `list_applications(false)`, with the launch-intent
    /// fallback appended as one more strategy — some sideloaded
    /// applications are only discoverable as launchable entry points.
    pub fn list_user_applications(&self) -> Result<Inventory> {
        let plan = strategy_plan(self.registry.capabilities(), true);
        self.run_plan(&plan, false)
    }

    fn run_plan(&self, plan: &[Strategy], include_system: bool) -> Result<Inventory> {
        let mut merged: HashMap<String, ApplicationRecord> = HashMap::new();
        let mut failures: Vec<StrategyFailure> = Vec::new();
        let mut dropped = 0usize;
        let mut any_succeeded = false;

        for strategy in plan {
            match strategy.run(self.registry.as_ref()) {
                Ok(descriptors) => {
                    any_succeeded = true;
                    debug!(
                        "Strategy {} yielded {} entries",
                        strategy.describe(),
                        descriptors.len()
                    );
                    for descriptor in descriptors {
                        // First-discovered-wins: strategy order is the tie-break
                        if merged.contains_key(&descriptor.identifier) {
                            continue;
                        }
                        if !include_system && descriptor.is_system() {
                            continue;
                        }
                        match self.resolve_record(&descriptor) {
                            Ok(record) => {
                                merged.insert(descriptor.identifier.clone(), record);
                            }
                            Err(e) => {
                                dropped += 1;
                                debug!("Dropping entry {}: {}", descriptor.identifier, e);
                            }
                        }
                    }
                }
                Err(error) => {
                    warn!(
                        "Enumeration strategy {} failed: {}",
                        strategy.describe(),
                        error
                    );
                    failures.push(StrategyFailure {
                        strategy: strategy.describe(),
                        error,
                    });
                }
            }
        }

        if !any_succeeded {
            if failures
                .iter()
                .any(|f| matches!(f.error, RegistryError::PermissionDenied))
            {
                return Err(AppListError::PermissionDenied);
            }
            let source: Box<dyn std::error::Error + Send + Sync> =
                match failures.into_iter().next() {
                    Some(failure) => Box::new(failure.error),
                    None => StringError::new("strategy plan was empty"),
                };
            return Err(AppListError::TotalFailure(source));
        }

        let mut records: Vec<ApplicationRecord> = merged.into_values().collect();
        records.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.identifier.cmp(&b.identifier))
        });

        Ok(Inventory {
            records,
            strategy_failures: failures,
            dropped_entries: dropped,
        })
    }

    /// Resolve one descriptor into a record
    ///
    /// Label resolution failure fails the entry; icon resolution can only
    /// leave `icon_path` absent.
    fn resolve_record(
        &self,
        descriptor: &AppDescriptor,
    ) -> std::result::Result<ApplicationRecord, RegistryError> {
        let name = self.registry.display_label(descriptor)?;
        let icon_path = self.icons.resolve(self.registry.as_ref(), descriptor);
        Ok(ApplicationRecord {
            name,
            identifier: descriptor.identifier.clone(),
            icon_path,
            is_system_app: descriptor.is_system(),
        })
    }
}
