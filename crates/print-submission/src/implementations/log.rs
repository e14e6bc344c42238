//! Logging submission backend.
//!
//! Writes each order to the tracing output instead of sending it anywhere.
//! Useful for demos where the order should be visible but not kept.

use crate::{SubmissionError, SubmissionFactory, SubmissionInterface, SubmissionRegistry};
use async_trait::async_trait;
use print_types::{
	current_timestamp, ConfigSchema, Field, FieldType, ImplementationRegistry, OrderReceipt,
	PlacedOrder, Schema, ValidationError,
};

/// Destination shown when none is configured.
pub const DEFAULT_DESTINATION: &str = "print-lab";

/// Submission backend that logs orders.
pub struct LogSubmission {
	/// Name of the print lab the orders are meant for, shown in each event.
	destination: String,
	/// Whether to include the full order as JSON in the log event.
	include_payload: bool,
}

impl LogSubmission {
	pub fn new(destination: impl Into<String>, include_payload: bool) -> Self {
		Self {
			destination: destination.into(),
			include_payload,
		}
	}
}

#[async_trait]
impl SubmissionInterface for LogSubmission {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(LogSubmissionSchema)
	}

	async fn submit(&self, order: &PlacedOrder) -> Result<OrderReceipt, SubmissionError> {
		if self.include_payload {
			let payload = serde_json::to_string(order)
				.map_err(|e| SubmissionError::Backend(e.to_string()))?;
			tracing::info!(
				destination = %self.destination,
				order_id = %order.id,
				%payload,
				"Order received"
			);
		} else {
			tracing::info!(
				destination = %self.destination,
				order_id = %order.id,
				prints = order.summary.print_count,
				total = %order.summary.total,
				"Order received"
			);
		}

		Ok(OrderReceipt {
			order_id: order.id.clone(),
			backend: Registry::NAME.to_string(),
			total: order.summary.total,
			accepted_at: current_timestamp(),
		})
	}
}

/// Configuration schema for LogSubmission.
pub struct LogSubmissionSchema;

impl ConfigSchema for LogSubmissionSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![],
			vec![
				Field::new("destination", FieldType::String).with_validator(|value| {
					match value.as_str() {
						Some(name) if !name.trim().is_empty() => Ok(()),
						_ => Err("Destination cannot be empty".to_string()),
					}
				}),
				Field::new("include_payload", FieldType::Boolean),
			],
		);
		schema.validate(config)
	}
}

/// Factory function to create a logging submission backend.
///
/// Configuration parameters:
/// - `destination` (optional, default "print-lab"): name shown in each event
/// - `include_payload` (optional, default false): log the whole order as JSON
pub fn create_submission(
	config: &toml::Value,
) -> Result<Box<dyn SubmissionInterface>, SubmissionError> {
	LogSubmissionSchema
		.validate(config)
		.map_err(|e| SubmissionError::Configuration(e.to_string()))?;

	let destination = config
		.get("destination")
		.and_then(|v| v.as_str())
		.unwrap_or(DEFAULT_DESTINATION);
	let include_payload = config
		.get("include_payload")
		.and_then(|v| v.as_bool())
		.unwrap_or(false);
	Ok(Box::new(LogSubmission::new(destination, include_payload)))
}

/// Registry for the log submission implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "log";
	type Factory = SubmissionFactory;

	fn factory() -> Self::Factory {
		create_submission
	}
}

impl SubmissionRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fixtures::placed_order;
	use rust_decimal::Decimal;

	#[tokio::test]
	async fn test_submit_returns_receipt() {
		for include_payload in [false, true] {
			let backend = LogSubmission::new(DEFAULT_DESTINATION, include_payload);
			let receipt = backend
				.submit(&placed_order("order-7", Decimal::new(297, 2)))
				.await
				.unwrap();

			assert_eq!(receipt.order_id, "order-7");
			assert_eq!(receipt.backend, "log");
			assert_eq!(receipt.total, Decimal::new(297, 2));
		}
	}

	#[test]
	fn test_factory_validates_config() {
		let config: toml::Value = toml::from_str("include_payload = true").unwrap();
		assert!(create_submission(&config).is_ok());

		let config: toml::Value = toml::from_str("include_payload = \"yes\"").unwrap();
		assert!(create_submission(&config).is_err());

		let config: toml::Value = toml::from_str("destination = \"Lab 2\"").unwrap();
		assert!(create_submission(&config).is_ok());

		let config: toml::Value = toml::from_str("destination = \" \"").unwrap();
		let err = create_submission(&config).err().unwrap();
		assert!(err.to_string().contains("Destination cannot be empty"));
	}
}
