//! Order submission module for the print-order checkout.
//!
//! Placing an order hands it to a submission backend. This module defines the
//! interface every backend implements, the registry of built-in backends and
//! a service wrapper that logs each hand-off. Payment and fulfilment live
//! behind the backend and are not modelled here.

use async_trait::async_trait;
use print_types::{ConfigSchema, ImplementationRegistry, OrderReceipt, PlacedOrder};
use std::collections::HashMap;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod log;
	pub mod memory;
}

/// Errors that can occur during order submission.
#[derive(Debug, Error)]
pub enum SubmissionError {
	/// The backend refused the order.
	#[error("Order rejected: {0}")]
	Rejected(String),
	/// The backend failed while handling the order.
	#[error("Backend error: {0}")]
	Backend(String),
	/// The backend configuration is invalid or names an unknown backend.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for order submission backends.
#[async_trait]
pub trait SubmissionInterface: Send + Sync {
	/// Returns the configuration schema for this backend.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Hands a placed order to the backend.
	///
	/// The backend owns the order from here on; the returned receipt is the
	/// only acknowledgement the checkout keeps.
	async fn submit(&self, order: &PlacedOrder) -> Result<OrderReceipt, SubmissionError>;
}

/// Type alias for submission factory functions.
pub type SubmissionFactory =
	fn(&toml::Value) -> Result<Box<dyn SubmissionInterface>, SubmissionError>;

/// Registry trait for submission implementations.
pub trait SubmissionRegistry: ImplementationRegistry<Factory = SubmissionFactory> {}

/// Get all registered submission implementations.
///
/// Returns (name, factory) pairs for every built-in backend.
pub fn get_all_implementations() -> Vec<(&'static str, SubmissionFactory)> {
	use implementations::{log, memory};

	vec![
		(log::Registry::NAME, log::Registry::factory()),
		(memory::Registry::NAME, memory::Registry::factory()),
	]
}

/// Service that forwards placed orders to the configured backend.
pub struct SubmissionService {
	/// Configured name of the backend.
	name: String,
	/// The underlying submission backend.
	backend: Box<dyn SubmissionInterface>,
}

impl SubmissionService {
	pub fn new(name: impl Into<String>, backend: Box<dyn SubmissionInterface>) -> Self {
		Self {
			name: name.into(),
			backend,
		}
	}

	/// Builds the primary backend named in the configuration.
	pub fn from_config(
		primary: &str,
		implementations: &HashMap<String, toml::Value>,
	) -> Result<Self, SubmissionError> {
		let config = implementations.get(primary).ok_or_else(|| {
			SubmissionError::Configuration(format!(
				"Submission implementation '{}' is not configured",
				primary
			))
		})?;

		let factory = get_all_implementations()
			.into_iter()
			.find(|(name, _)| *name == primary)
			.map(|(_, factory)| factory)
			.ok_or_else(|| {
				SubmissionError::Configuration(format!(
					"Unknown submission implementation '{}'",
					primary
				))
			})?;

		let backend = factory(config)?;

		tracing::info!(backend = %primary, "Initialized order submission");
		Ok(Self::new(primary, backend))
	}

	/// Name of the backend orders are sent to.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Submits an order to the backend.
	pub async fn submit(&self, order: &PlacedOrder) -> Result<OrderReceipt, SubmissionError> {
		tracing::debug!(order_id = %order.id, backend = %self.name, "Submitting order");

		match self.backend.submit(order).await {
			Ok(receipt) => {
				tracing::info!(
					order_id = %receipt.order_id,
					backend = %self.name,
					total = %receipt.total,
					"Order submitted"
				);
				Ok(receipt)
			},
			Err(e) => {
				tracing::warn!(order_id = %order.id, backend = %self.name, error = %e, "Order submission failed");
				Err(e)
			},
		}
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	fn empty_table() -> toml::Value {
		toml::Value::Table(toml::map::Map::new())
	}

	#[test]
	fn test_registered_implementations() {
		let names: Vec<&str> = get_all_implementations()
			.into_iter()
			.map(|(name, _)| name)
			.collect();
		assert_eq!(names, vec!["log", "memory"]);
	}

	#[test]
	fn test_from_config_builds_primary() {
		let mut implementations = HashMap::new();
		implementations.insert("memory".to_string(), empty_table());

		let service = SubmissionService::from_config("memory", &implementations).unwrap();
		assert_eq!(service.name(), "memory");
	}

	#[test]
	fn test_from_config_requires_configured_primary() {
		let implementations = HashMap::new();
		let err = SubmissionService::from_config("memory", &implementations)
			.err()
			.unwrap();
		assert!(err.to_string().contains("not configured"));
	}

	#[test]
	fn test_from_config_rejects_unknown_backend() {
		let mut implementations = HashMap::new();
		implementations.insert("fax".to_string(), empty_table());

		let err = SubmissionService::from_config("fax", &implementations)
			.err()
			.unwrap();
		assert!(err.to_string().contains("Unknown submission implementation 'fax'"));
	}

	#[test]
	fn test_from_config_validates_schema() {
		let mut implementations = HashMap::new();
		implementations.insert(
			"memory".to_string(),
			toml::from_str::<toml::Value>("capacity = 0").unwrap(),
		);

		let err = SubmissionService::from_config("memory", &implementations)
			.err()
			.unwrap();
		assert!(matches!(err, SubmissionError::Configuration(_)));
	}
}
