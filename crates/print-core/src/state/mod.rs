//! State management for the checkout flow.
//!
//! This module provides the controller that sequences the wizard steps,
//! clamping navigation to the valid range instead of failing.

pub mod wizard;

pub use wizard::WizardController;
