//! Raw application descriptors and registry flag sets
//!
//! These types mirror what the host application registry reports before any
//! merging or classification happens. [`MatchFlags`] selects enumeration
//! visibility; [`AppFlags`] carries the OS-reported per-application flags the
//! classification rule is built on.

use bitflags::bitflags;

bitflags! {
    /// Enumeration filter set passed to the application registry
    ///
    /// No single filter set reliably returns the complete application set
    /// across host versions, so the inventory builder issues several queries
    /// with different filters and merges the results. A registry advertises
    /// which filters it understands via
    /// [`PackageRegistry::capabilities`](super::PackageRegistry::capabilities);
    /// unsupported filters are never sent to it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MatchFlags: u32 {
        /// Include application metadata in the returned descriptors
        const METADATA = 1 << 0;
        /// Match applications that are uninstalled but still have data present
        const UNINSTALLED = 1 << 1;
        /// Broadest visibility filter the host offers
        const MATCH_ALL = 1 << 2;
        /// Match applications whose components have been disabled
        const DISABLED_COMPONENTS = 1 << 3;
    }
}

bitflags! {
    /// OS-reported flags on a single application
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AppFlags: u32 {
        /// Built into the OS image
        const SYSTEM = 1 << 0;
        /// A system application that has since been updated by the user
        const UPDATED_SYSTEM = 1 << 1;
        /// Hidden from launchers by the host
        const HIDDEN = 1 << 2;
    }
}

/// Raw application entry yielded by an enumeration strategy
///
/// Carries only what the registry reports directly; display label and icon
/// are resolved lazily per entry, so a descriptor with a broken label or
/// icon can still be skipped without aborting the enclosing enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDescriptor {
    /// Reverse-domain package identifier (e.g. `org.mozilla.firefox`)
    pub identifier: String,
    /// OS-reported flags
    pub flags: AppFlags,
}

impl AppDescriptor {
    /// Create a descriptor with no flags set
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            flags: AppFlags::empty(),
        }
    }

    /// Create a descriptor with explicit flags
    pub fn with_flags(identifier: impl Into<String>, flags: AppFlags) -> Self {
        Self {
            identifier: identifier.into(),
            flags,
        }
    }

    /// Classification rule for system applications
    ///
    /// An application counts as a system app if it is built into the OS
    /// image, or if it is a system app that has since been updated by the
    /// user. Both states map to `true`.
    pub fn is_system(&self) -> bool {
        self.flags
            .intersects(AppFlags::SYSTEM | AppFlags::UPDATED_SYSTEM)
    }
}

/// Rasterized icon artifact returned by the registry
///
/// Pixel data is RGBA8, row-major, `width * height * 4` bytes.
#[derive(Debug, Clone)]
pub struct IconBitmap {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Raw RGBA pixel data
    pub rgba: Vec<u8>,
}

impl IconBitmap {
    /// Create a bitmap, checking the buffer length against the dimensions
    ///
    /// Returns `None` if `rgba.len() != width * height * 4`.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        if rgba.len() == (width as usize) * (height as usize) * 4 {
            Some(Self {
                width,
                height,
                rgba,
            })
        } else {
            None
        }
    }
}
