//! Application inventory construction
//!
//! This module turns raw registry enumeration into an ordered, deduplicated
//! application listing:
//!
//! - [`strategy`] derives the ordered enumeration plan from the registry's
//!   advertised capabilities
//! - [`builder`] folds the strategies' results into an identifier-keyed
//!   merge, classifies entries, resolves labels and icons, and sorts the
//!   survivors
//!
//! The result type, [`Inventory`], is tiered: full success, partial success
//! with recorded omissions, or (only when every strategy fails) an error.

pub mod builder;
pub mod strategy;

pub use builder::{ApplicationRecord, Inventory, InventoryBuilder, StrategyFailure};
pub use strategy::{Strategy, strategy_plan};
