//! Freedesktop application registry (Unix)
//!
//! This backend scans `.desktop` entries across the XDG data directories and
//! exposes them through the [`PackageRegistry`] trait. Entries found under
//! the per-user data directory are user applications; entries shipped in the
//! system data directories (plus flatpak/snap export directories) classify
//! as system applications.
//!
//! # Filter mapping
//!
//! The freedesktop world has no uninstalled-but-data-present state, so
//! [`MatchFlags::UNINSTALLED`] is not advertised. The other filters map to
//! entry keys:
//!
//! - `NoDisplay=true` entries surface only under [`MatchFlags::MATCH_ALL`]
//! - `Hidden=true` entries surface only under [`MatchFlags::DISABLED_COMPONENTS`]
//!
//! # Entry cache
//!
//! Parsed entries are cached per identifier on first enumeration so label
//! and icon resolution do not re-read the entry file. The cache is
//! insert-if-absent: the first directory to provide an identifier wins,
//! which matches XDG precedence since the user directory is scanned first.

use super::{AppDescriptor, AppFlags, IconBitmap, MatchFlags, PackageRegistry, RegistryError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Parsed `[Desktop Entry]` section of a `.desktop` file
#[derive(Debug, Clone)]
pub struct DesktopEntry {
    /// User-visible name (`Name=`)
    pub name: String,
    /// Icon name or absolute icon path (`Icon=`)
    pub icon: Option<String>,
    /// Launch command line (`Exec=`)
    pub exec: Option<String>,
    /// Entry is hidden from launchers (`NoDisplay=true`)
    pub no_display: bool,
    /// Entry is disabled entirely (`Hidden=true`)
    pub hidden: bool,
}

/// Parse the `[Desktop Entry]` section of a `.desktop` file
///
/// Returns `None` for anything that is not a `Type=Application` entry with
/// a `Name=` key. Lines outside the `[Desktop Entry]` section are ignored,
/// as are comments and malformed lines.
pub fn parse_desktop_entry(content: &str) -> Option<DesktopEntry> {
    let mut entries = HashMap::new();
    let mut in_desktop_entry = false;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            in_desktop_entry = line == "[Desktop Entry]";
            continue;
        }

        if in_desktop_entry {
            if let Some((key, value)) = line.split_once('=') {
                entries.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
    }

    if entries.get("Type").map(String::as_str) != Some("Application") {
        return None;
    }

    let name = entries.get("Name")?.clone();

    Some(DesktopEntry {
        name,
        icon: entries.get("Icon").cloned(),
        exec: entries.get("Exec").cloned(),
        no_display: entries.get("NoDisplay").map(String::as_str) == Some("true"),
        hidden: entries.get("Hidden").map(String::as_str) == Some("true"),
    })
}

/// Cached entry plus where it came from
#[derive(Debug, Clone)]
struct CachedEntry {
    entry: DesktopEntry,
    system: bool,
}

/// Application registry backed by freedesktop `.desktop` entries
pub struct DesktopRegistry {
    /// Application directories in precedence order, with system classification
    application_dirs: Vec<(PathBuf, bool)>,
    /// Icon search roots (icon themes and pixmap directories)
    icon_dirs: Vec<PathBuf>,
    /// Parsed entries keyed by identifier, filled during enumeration
    entries: RwLock<HashMap<String, CachedEntry>>,
}

impl DesktopRegistry {
    /// Create a registry over the host's XDG directories
    pub fn new() -> Self {
        Self {
            application_dirs: application_directories(),
            icon_dirs: icon_directories(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry over explicit directories
    ///
    /// User directories are scanned before system directories; entries found
    /// under system directories classify as system applications.
    pub fn with_directories(
        user_dirs: Vec<PathBuf>,
        system_dirs: Vec<PathBuf>,
        icon_dirs: Vec<PathBuf>,
    ) -> Self {
        let mut application_dirs: Vec<(PathBuf, bool)> =
            user_dirs.into_iter().map(|d| (d, false)).collect();
        application_dirs.extend(system_dirs.into_iter().map(|d| (d, true)));
        Self {
            application_dirs,
            icon_dirs,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Scan all application directories, caching parsed entries
    ///
    /// Missing directories are skipped; unreadable or malformed entry files
    /// are logged and skipped so one broken file never aborts the scan.
    fn scan(&self) -> Vec<(String, CachedEntry)> {
        let mut found = Vec::new();
        let mut seen = std::collections::HashSet::new();
        let mut cache = self.entries.write();

        for (dir, system) in &self.application_dirs {
            if !dir.is_dir() {
                continue;
            }

            for file in WalkDir::new(dir)
                .max_depth(2)
                .into_iter()
                .filter_map(std::result::Result::ok)
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "desktop"))
            {
                let Some(identifier) = file.path().file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };

                // First directory to provide an identifier wins (XDG precedence)
                if !seen.insert(identifier.to_string()) {
                    continue;
                }

                let cached = if let Some(cached) = cache.get(identifier) {
                    cached.clone()
                } else {
                    let content = match std::fs::read_to_string(file.path()) {
                        Ok(content) => content,
                        Err(e) => {
                            debug!("Skipping unreadable entry {:?}: {}", file.path(), e);
                            continue;
                        }
                    };
                    let Some(entry) = parse_desktop_entry(&content) else {
                        continue;
                    };
                    let cached = CachedEntry {
                        entry,
                        system: *system,
                    };
                    cache.insert(identifier.to_string(), cached.clone());
                    cached
                };

                found.push((identifier.to_string(), cached));
            }
        }

        found
    }

    /// Look up a cached entry, warming the cache if needed
    fn lookup(&self, identifier: &str) -> Option<CachedEntry> {
        if let Some(cached) = self.entries.read().get(identifier) {
            return Some(cached.clone());
        }
        // Descriptor from an earlier process run or another registry
        // instance: warm the cache with a full scan before giving up.
        self.scan();
        self.entries.read().get(identifier).cloned()
    }

    fn descriptor_flags(cached: &CachedEntry) -> AppFlags {
        let mut flags = AppFlags::empty();
        if cached.system {
            flags |= AppFlags::SYSTEM;
        }
        if cached.entry.no_display {
            flags |= AppFlags::HIDDEN;
        }
        flags
    }

    /// Find a raster icon file for an `Icon=` value
    ///
    /// Absolute paths are used as-is; bare names are searched as `<name>.png`
    /// under the icon roots. SVG-only themes yield no icon here, which the
    /// caller treats as extraction failure (soft-fail).
    fn find_icon_file(&self, icon: &str) -> Option<PathBuf> {
        let direct = Path::new(icon);
        if direct.is_absolute() {
            return direct.is_file().then(|| direct.to_path_buf());
        }

        let wanted = format!("{icon}.png");
        for root in &self.icon_dirs {
            if !root.is_dir() {
                continue;
            }
            for file in WalkDir::new(root)
                .max_depth(4)
                .into_iter()
                .filter_map(std::result::Result::ok)
            {
                if file.file_type().is_file()
                    && file.file_name().to_str() == Some(wanted.as_str())
                {
                    return Some(file.path().to_path_buf());
                }
            }
        }
        None
    }
}

impl Default for DesktopRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageRegistry for DesktopRegistry {
    fn capabilities(&self) -> MatchFlags {
        // No uninstalled-but-data-present state on freedesktop hosts
        MatchFlags::METADATA | MatchFlags::MATCH_ALL | MatchFlags::DISABLED_COMPONENTS
    }

    fn installed_applications(
        &self,
        flags: MatchFlags,
    ) -> std::result::Result<Vec<AppDescriptor>, RegistryError> {
        let mut result = Vec::new();

        for (identifier, cached) in self.scan() {
            if cached.entry.hidden && !flags.contains(MatchFlags::DISABLED_COMPONENTS) {
                continue;
            }
            if cached.entry.no_display && !flags.contains(MatchFlags::MATCH_ALL) {
                continue;
            }
            result.push(AppDescriptor::with_flags(
                identifier,
                Self::descriptor_flags(&cached),
            ));
        }

        Ok(result)
    }

    fn launchable_entry_points(&self) -> std::result::Result<Vec<AppDescriptor>, RegistryError> {
        let mut result = Vec::new();

        for (identifier, cached) in self.scan() {
            // Launcher-visible means it has a launch command and is not hidden
            if cached.entry.exec.is_none() || cached.entry.no_display || cached.entry.hidden {
                continue;
            }
            result.push(AppDescriptor::with_flags(
                identifier,
                Self::descriptor_flags(&cached),
            ));
        }

        Ok(result)
    }

    fn display_label(
        &self,
        descriptor: &AppDescriptor,
    ) -> std::result::Result<String, RegistryError> {
        self.lookup(&descriptor.identifier)
            .map(|cached| cached.entry.name)
            .ok_or_else(|| RegistryError::EntryUnavailable(descriptor.identifier.clone()))
    }

    fn icon_bitmap(
        &self,
        descriptor: &AppDescriptor,
    ) -> std::result::Result<IconBitmap, RegistryError> {
        let cached = self
            .lookup(&descriptor.identifier)
            .ok_or_else(|| RegistryError::EntryUnavailable(descriptor.identifier.clone()))?;

        let icon_name = cached
            .entry
            .icon
            .ok_or_else(|| RegistryError::EntryUnavailable(descriptor.identifier.clone()))?;

        let icon_path = self.find_icon_file(&icon_name).ok_or_else(|| {
            debug!(
                "No raster icon named {:?} for {}",
                icon_name, descriptor.identifier
            );
            RegistryError::EntryUnavailable(descriptor.identifier.clone())
        })?;

        let img = image::open(&icon_path).map_err(|e| {
            warn!("Failed to decode icon {:?}: {}", icon_path, e);
            RegistryError::Enumeration(Box::new(e))
        })?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(IconBitmap {
            width,
            height,
            rgba: rgba.into_raw(),
        })
    }
}

/// Application `.desktop` directories in precedence order (user first)
fn application_directories() -> Vec<(PathBuf, bool)> {
    let mut dirs = Vec::new();
    let home = std::env::var("HOME").unwrap_or_default();

    let xdg_data_home =
        std::env::var("XDG_DATA_HOME").unwrap_or_else(|_| format!("{home}/.local/share"));
    let xdg_data_dirs = std::env::var("XDG_DATA_DIRS")
        .unwrap_or_else(|_| "/usr/local/share:/usr/share".to_string());

    dirs.push((PathBuf::from(&xdg_data_home).join("applications"), false));
    dirs.push((
        PathBuf::from(&home).join(".local/share/flatpak/exports/share/applications"),
        false,
    ));

    for data_dir in xdg_data_dirs.split(':') {
        if !data_dir.is_empty() {
            dirs.push((PathBuf::from(data_dir).join("applications"), true));
        }
    }

    dirs.push((
        PathBuf::from("/var/lib/flatpak/exports/share/applications"),
        true,
    ));
    dirs.push((PathBuf::from("/var/lib/snapd/desktop/applications"), true));

    dirs
}

/// Icon search roots (XDG icon themes + pixmaps + flatpak/snap exports)
fn icon_directories() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    let home = std::env::var("HOME").unwrap_or_default();

    let xdg_data_home =
        std::env::var("XDG_DATA_HOME").unwrap_or_else(|_| format!("{home}/.local/share"));
    let xdg_data_dirs = std::env::var("XDG_DATA_DIRS")
        .unwrap_or_else(|_| "/usr/local/share:/usr/share".to_string());

    dirs.push(PathBuf::from(&xdg_data_home).join("icons"));
    dirs.push(PathBuf::from(&home).join(".icons"));

    for data_dir in xdg_data_dirs.split(':') {
        if !data_dir.is_empty() {
            dirs.push(PathBuf::from(data_dir).join("icons"));
            dirs.push(PathBuf::from(data_dir).join("pixmaps"));
        }
    }

    dirs.push(PathBuf::from("/usr/share/pixmaps"));
    dirs.push(PathBuf::from("/var/lib/flatpak/exports/share/icons"));
    dirs.push(PathBuf::from("/var/lib/snapd/desktop/icons"));

    dirs
}
