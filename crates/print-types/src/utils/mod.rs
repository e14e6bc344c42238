//! Utility functions for formatting money and reading the clock.

pub mod formatting;
pub mod helpers;

pub use formatting::{format_money, format_percent, round_money};
pub use helpers::current_timestamp;
