//! Common types module for the print-order checkout.
//!
//! This module defines the data types shared by the checkout crates: the
//! print size catalog, photos and their size selections, the order state
//! snapshot, wizard steps, shipping details and placed orders. Keeping them
//! in one crate lets the configuration, submission and core crates agree on
//! a single vocabulary.

/// Print size catalog entries and lookup.
pub mod catalog;
/// Order state snapshots, summaries, shipping details and placed orders.
pub mod order;
/// Photos and their per-size selections.
pub mod photo;
/// Registry trait for named, configurable implementations.
pub mod registry;
/// Utility functions for formatting and timestamps.
pub mod utils;
/// Configuration validation types for implementation-specific settings.
pub mod validation;
/// Wizard step definitions.
pub mod wizard;

pub use catalog::*;
pub use order::*;
pub use photo::*;
pub use registry::ImplementationRegistry;
pub use utils::{current_timestamp, format_money, format_percent, round_money};
pub use validation::*;
pub use wizard::*;
