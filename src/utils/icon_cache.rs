//! Disk icon cache keyed by application identifier
//!
//! Icons are stored as PNG files, one per application identifier, under a
//! single cache directory. The cache is content-addressed by identifier —
//! not by icon content — so a file, once written, is reused on every later
//! call with no staleness check. The directory is append-only from this
//! component's point of view: files are created, never updated or deleted.
//!
//! # Failure semantics
//!
//! Resolution is soft-fail only. [`IconCache::resolve`] signals failure
//! solely by returning `None`; it never raises to its caller, because icon
//! absence must never fail an enclosing listing operation.
//!
//! # Concurrency
//!
//! Writes go through a temporary file in the cache directory followed by an
//! atomic persist. Two racing writers for the same identifier end with one
//! whole file from either writer; icon content is immutable per identifier
//! in practice, so the race is benign.

use crate::error::{IconCacheError, Result};
use crate::registry::{AppDescriptor, IconBitmap, PackageRegistry};
use image::{ImageFormat, imageops::FilterType};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Icon cache manager for persistent icon storage
///
/// All methods take `&self`; the only mutable state is the directory on
/// disk. `Send + Sync` so the deferred bridge entry points can share it
/// across threads.
#[derive(Debug)]
pub struct IconCache {
    /// Cache directory path
    cache_dir: PathBuf,
    /// Edge length icons are resized to before encoding
    icon_size: u32,
}

impl IconCache {
    /// Create a new icon cache manager
    ///
    /// Creates the cache directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`IconCacheError::CacheDirectoryCreationFailed`] if the
    /// directory cannot be created.
    pub fn new(cache_dir: impl Into<PathBuf>, icon_size: u32) -> Result<Self> {
        let cache_dir = cache_dir.into();

        if !cache_dir.exists() {
            std::fs::create_dir_all(&cache_dir).map_err(|source| {
                IconCacheError::CacheDirectoryCreationFailed {
                    path: cache_dir.clone(),
                    source,
                }
            })?;
        }

        Ok(Self {
            cache_dir,
            icon_size,
        })
    }

    /// Default cache directory: `<platform cache dir>/applist/app_icons`
    pub fn default_cache_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("applist")
            .join("app_icons")
    }

    /// Cache file path for an identifier: `<cache_dir>/<identifier>.png`
    ///
    /// Deterministic — same path every call for the same identifier.
    pub fn cache_path(&self, identifier: &str) -> PathBuf {
        self.cache_dir.join(format!("{identifier}.png"))
    }

    /// Resolve the cached icon path for an application, extracting if needed
    ///
    /// If a file already exists at the cache path it is returned
    /// immediately, with no re-extraction and no staleness check.
    /// Otherwise the registry is asked for the icon bitmap, which is
    /// resized, PNG-encoded and written atomically. Any failure returns
    /// `None`.
    pub fn resolve(
        &self,
        registry: &dyn PackageRegistry,
        descriptor: &AppDescriptor,
    ) -> Option<PathBuf> {
        let identifier = descriptor.identifier.as_str();

        if !identifier_is_safe(identifier) {
            debug!("Refusing unsafe icon cache name for {:?}", identifier);
            return None;
        }

        let path = self.cache_path(identifier);
        if path.exists() {
            return Some(path);
        }

        let bitmap = match registry.icon_bitmap(descriptor) {
            Ok(bitmap) => bitmap,
            Err(e) => {
                debug!("No icon artifact for {}: {}", identifier, e);
                return None;
            }
        };

        match self.store(&path, identifier, &bitmap) {
            Ok(()) => Some(path),
            Err(e) => {
                warn!("Failed to cache icon for {}: {}", identifier, e);
                None
            }
        }
    }

    /// Encode a bitmap and write it to `path` via an atomic persist
    fn store(
        &self,
        path: &Path,
        identifier: &str,
        bitmap: &IconBitmap,
    ) -> std::result::Result<(), IconCacheError> {
        let png_bytes = self.encode_bitmap_to_png(identifier, bitmap)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.cache_dir)
            .map_err(IconCacheError::TempFileCreationFailed)?;
        tmp.write_all(&png_bytes)
            .map_err(IconCacheError::TempFileCreationFailed)?;
        tmp.persist(path)
            .map_err(IconCacheError::AtomicPersistFailed)?;

        Ok(())
    }

    /// Encode RGBA bitmap data to PNG, resizing to the configured edge
    ///
    /// Pre-allocates the output buffer; small icons compress well under
    /// the default capacity so reallocation is rare.
    fn encode_bitmap_to_png(
        &self,
        identifier: &str,
        bitmap: &IconBitmap,
    ) -> std::result::Result<Vec<u8>, IconCacheError> {
        let expected = (bitmap.width as usize) * (bitmap.height as usize) * 4;
        if bitmap.rgba.len() != expected {
            return Err(IconCacheError::InvalidBitmap {
                identifier: identifier.to_string(),
                expected,
                actual: bitmap.rgba.len(),
            });
        }

        let buffer = image::RgbaImage::from_raw(bitmap.width, bitmap.height, bitmap.rgba.clone())
            .ok_or_else(|| IconCacheError::InvalidBitmap {
                identifier: identifier.to_string(),
                expected,
                actual: bitmap.rgba.len(),
            })?;

        let img = image::DynamicImage::ImageRgba8(buffer);
        let img = if bitmap.width == self.icon_size && bitmap.height == self.icon_size {
            img
        } else {
            // Lanczos3 keeps edges sharp when downscaling launcher icons
            img.resize_exact(self.icon_size, self.icon_size, FilterType::Lanczos3)
        };

        let mut png_bytes = Vec::with_capacity(8192);
        img.write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
            .map_err(|source| IconCacheError::PngEncoding {
                identifier: identifier.to_string(),
                source,
            })?;

        Ok(png_bytes)
    }

    /// Get cache statistics
    ///
    /// Counts the PNG files in the cache directory and sums their sizes.
    pub fn stats(&self) -> Result<CacheStats> {
        let mut count = 0;
        let mut size_bytes = 0;

        for entry in std::fs::read_dir(&self.cache_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "png") {
                count += 1;
                size_bytes += entry.metadata()?.len();
            }
        }

        Ok(CacheStats { count, size_bytes })
    }
}

/// Whether an identifier is usable verbatim as a cache file name
///
/// Reverse-domain identifiers are; anything carrying path separators,
/// parent references, or an empty name is not.
fn identifier_is_safe(identifier: &str) -> bool {
    !identifier.is_empty()
        && identifier != "."
        && identifier != ".."
        && !identifier.contains(['/', '\\'])
        && !identifier.contains('\0')
}

/// Cache statistics
#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    /// Number of cached icons
    pub count: usize,
    /// Total size of all cached icons in bytes
    pub size_bytes: u64,
}

impl CacheStats {
    /// Format size as a human-readable string like "42 KB" or "1.5 MB"
    pub fn size_human_readable(&self) -> String {
        const KB: u64 = 1024;
        const MB: u64 = 1024 * KB;

        if self.size_bytes >= MB {
            #[expect(
                clippy::cast_precision_loss,
                reason = "display formatting only, precision loss is irrelevant"
            )]
            let mb = self.size_bytes as f64 / MB as f64;
            format!("{mb:.1} MB")
        } else if self.size_bytes >= KB {
            format!("{} KB", self.size_bytes / KB)
        } else {
            format!("{} bytes", self.size_bytes)
        }
    }
}
