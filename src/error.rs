//! Error types for the `applist` crate
//!
//! This module defines all error types used throughout the crate,
//! providing clear error messages and proper error propagation.
//!
//! Error variants use `#[source]` to preserve error chains for better
//! observability and debugging.

use std::path::PathBuf;
use thiserror::Error;

/// Simple error type for wrapping string messages while implementing `std::error::Error`
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StringError(pub String);

impl StringError {
    /// Create a new `StringError` from a string message
    pub fn new(msg: impl Into<String>) -> Box<Self> {
        Box::new(Self(msg.into()))
    }
}

/// Main error type for the `applist` crate
#[derive(Debug, Error)]
pub enum AppListError {
    /// The application registry refused enumeration outright
    #[error("Missing permission to query installed applications")]
    PermissionDenied,

    /// Every enumeration strategy failed
    /// Preserves the first strategy failure for full error chain transparency
    #[error("All enumeration strategies failed: {0}")]
    TotalFailure(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Icon cache error
    #[error("Icon cache error: {0}")]
    IconCache(#[from] IconCacheError),

    /// Configuration error
    /// Preserves the underlying error source for full error chain transparency
    #[error("Configuration error: {0}")]
    ConfigError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Errors produced by the disk icon cache
///
/// Kept separate from [`AppListError`] so cache internals stay matchable in
/// tests while callers of the inventory API only ever observe the soft-fail
/// behavior (an absent icon).
#[derive(Debug, Error)]
pub enum IconCacheError {
    /// The cache directory could not be created
    #[error("Failed to create icon cache directory {path}: {source}")]
    CacheDirectoryCreationFailed {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Identifier is not usable as a cache file name
    #[error("Identifier {identifier:?} is not a safe cache file name")]
    UnsafeIdentifier {
        /// Offending application identifier
        identifier: String,
    },

    /// Bitmap dimensions do not match the pixel buffer length
    #[error("Bitmap for {identifier} has {actual} bytes, expected {expected}")]
    InvalidBitmap {
        /// Application identifier the bitmap belongs to
        identifier: String,
        /// Expected buffer length (`width * height * 4`)
        expected: usize,
        /// Actual buffer length
        actual: usize,
    },

    /// PNG encoding failed
    #[error("Failed to encode icon for {identifier}: {source}")]
    PngEncoding {
        /// Application identifier the icon belongs to
        identifier: String,
        /// Underlying image error
        source: image::ImageError,
    },

    /// Temporary file creation failed
    #[error("Failed to create temporary cache file: {0}")]
    TempFileCreationFailed(#[source] std::io::Error),

    /// Atomic rename of the temporary file onto the cache path failed
    #[error("Failed to persist icon cache file: {0}")]
    AtomicPersistFailed(#[source] tempfile::PersistError),
}

/// Result type alias for `applist` operations
pub type Result<T> = std::result::Result<T, AppListError>;
