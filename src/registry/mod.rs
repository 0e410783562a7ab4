//! Host application-registry abstraction
//!
//! This module defines the collaborator interface the inventory builder
//! queries: a [`PackageRegistry`] enumerates installed applications under a
//! given visibility filter, resolves display labels, and rasterizes icons.
//! The interface exists because the enumeration logic must not branch on
//! host versions inline — a registry reports the maximal filter set it
//! supports once, via [`PackageRegistry::capabilities`], and the strategy
//! plan is derived from that.
//!
//! # Backends
//!
//! - [`DesktopRegistry`] (Unix only): scans freedesktop `.desktop` entries
//!   across the XDG data directories.
//! - Tests script their own registry implementations; the trait is the only
//!   contract.

mod descriptor;

#[cfg(unix)]
mod desktop;

pub use descriptor::{AppDescriptor, AppFlags, IconBitmap, MatchFlags};

#[cfg(unix)]
pub use desktop::{DesktopEntry, DesktopRegistry, parse_desktop_entry};

use thiserror::Error;

/// Errors reported by a [`PackageRegistry`] backend
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The host refused the query at the permission layer
    #[error("Registry access denied")]
    PermissionDenied,

    /// An enumeration query failed
    /// Preserves the underlying error source for full error chain transparency
    #[error("Enumeration failed: {0}")]
    Enumeration(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Metadata for a single application could not be resolved
    #[error("No usable metadata for {0}")]
    EntryUnavailable(String),
}

/// Host application registry
///
/// Implementations wrap whatever the host OS offers for listing installed
/// applications. All methods are best-effort from the caller's point of
/// view: the inventory builder recovers from any error a registry returns,
/// at per-entry or per-strategy granularity.
///
/// `Send + Sync` is required so the deferred bridge entry points can run a
/// listing on a worker thread.
pub trait PackageRegistry: Send + Sync {
    /// The maximal filter set this host supports
    ///
    /// Decided once per registry instance; the inventory builder never
    /// issues a query with a filter outside this set.
    fn capabilities(&self) -> MatchFlags;

    /// Enumerate installed applications under the given filter set
    fn installed_applications(
        &self,
        flags: MatchFlags,
    ) -> std::result::Result<Vec<AppDescriptor>, RegistryError>;

    /// Enumerate applications resolvable as user-facing launch targets
    ///
    /// Some applications are only discoverable through launch-intent
    /// resolution, not through the standard installed-application listing;
    /// this is the fallback registry for those.
    fn launchable_entry_points(&self) -> std::result::Result<Vec<AppDescriptor>, RegistryError>;

    /// Resolve the human-readable, locale-dependent display label
    fn display_label(
        &self,
        descriptor: &AppDescriptor,
    ) -> std::result::Result<String, RegistryError>;

    /// Rasterize the application icon
    fn icon_bitmap(
        &self,
        descriptor: &AppDescriptor,
    ) -> std::result::Result<IconBitmap, RegistryError>;

    /// Whether the host has granted usage-statistics access to this process
    ///
    /// Hosts without a usage-access concept report `false`.
    fn usage_access_granted(&self) -> std::result::Result<bool, RegistryError> {
        Ok(false)
    }
}
