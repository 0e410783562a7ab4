//! Enumeration strategies and the strategy plan
//!
//! No single registry query reliably returns the complete application set
//! across host versions — some filters silently omit disabled,
//! uninstalled-but-data-present, or component-disabled applications. The
//! inventory builder therefore runs an ordered list of strategies and merges
//! the results; this module defines the strategies and derives the ordered
//! plan from a registry's advertised capabilities.

use crate::registry::{AppDescriptor, MatchFlags, PackageRegistry, RegistryError};

/// One enumeration attempt against the application registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Standard installed-application listing under a filter set
    Installed(MatchFlags),
    /// Launch-intent resolution fallback
    ///
    /// Some sideloaded or alternatively-installed applications are only
    /// discoverable as launchable entry points.
    Launchable,
}

impl Strategy {
    /// Run this strategy against a registry
    pub fn run(
        &self,
        registry: &dyn PackageRegistry,
    ) -> std::result::Result<Vec<AppDescriptor>, RegistryError> {
        match self {
            Self::Installed(flags) => registry.installed_applications(*flags),
            Self::Launchable => registry.launchable_entry_points(),
        }
    }

    /// Short human-readable description, used in logs and failure reports
    pub fn describe(&self) -> String {
        match self {
            Self::Installed(flags) => format!("installed({flags:?})"),
            Self::Launchable => "launchable".to_string(),
        }
    }
}

/// Build the ordered strategy plan for a listing call
///
/// The order is fixed and doubles as the tie-break for the
/// first-discovered-wins merge: when two strategies disagree on a mutable
/// field such as the display label, the earlier strategy's record stands.
///
/// Filters outside `capabilities` are narrowed to what the host supports;
/// strategies whose narrowed filter duplicates an earlier one are dropped
/// rather than queried twice.
pub fn strategy_plan(capabilities: MatchFlags, include_launchable: bool) -> Vec<Strategy> {
    let candidates = [
        MatchFlags::METADATA,
        MatchFlags::METADATA | MatchFlags::UNINSTALLED,
        MatchFlags::METADATA | MatchFlags::MATCH_ALL,
        MatchFlags::METADATA | MatchFlags::DISABLED_COMPONENTS,
    ];

    let mut plan = Vec::with_capacity(candidates.len() + 1);
    for candidate in candidates {
        let narrowed = candidate & capabilities;
        let strategy = Strategy::Installed(narrowed);
        if !plan.contains(&strategy) {
            plan.push(strategy);
        }
    }

    if include_launchable {
        plan.push(Strategy::Launchable);
    }

    plan
}
