//! Utility modules
//!
//! Provides the disk icon cache and logging initialization.

pub mod icon_cache;
pub mod logging;

pub use icon_cache::{CacheStats, IconCache};
pub use logging::init_logging;
