//! In-memory submission backend.
//!
//! Keeps every submitted order in a vector for the lifetime of the process.
//! Nothing is persisted, which makes it the default for local runs and tests.

use crate::{SubmissionError, SubmissionFactory, SubmissionInterface, SubmissionRegistry};
use async_trait::async_trait;
use print_types::{
	current_timestamp, ConfigSchema, Field, FieldType, ImplementationRegistry, OrderReceipt,
	PlacedOrder, Schema, ValidationError,
};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Orders accepted by a [`MemorySubmission`], shared with whoever needs to
/// inspect them.
pub type SubmittedOrders = Arc<RwLock<Vec<PlacedOrder>>>;

/// In-memory submission implementation.
pub struct MemorySubmission {
	orders: SubmittedOrders,
	/// Maximum number of orders to accept, if limited.
	capacity: Option<usize>,
}

impl MemorySubmission {
	pub fn new() -> Self {
		Self {
			orders: Arc::new(RwLock::new(Vec::new())),
			capacity: None,
		}
	}

	/// Creates a backend that rejects orders once `capacity` are held.
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			capacity: Some(capacity),
			..Self::new()
		}
	}

	/// Handle to the accepted orders.
	pub fn orders(&self) -> SubmittedOrders {
		Arc::clone(&self.orders)
	}
}

impl Default for MemorySubmission {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl SubmissionInterface for MemorySubmission {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(MemorySubmissionSchema)
	}

	async fn submit(&self, order: &PlacedOrder) -> Result<OrderReceipt, SubmissionError> {
		let mut orders = self.orders.write().await;

		if orders.iter().any(|existing| existing.id == order.id) {
			return Err(SubmissionError::Rejected(format!(
				"Order {} was already submitted",
				order.id
			)));
		}
		if let Some(capacity) = self.capacity {
			if orders.len() >= capacity {
				return Err(SubmissionError::Rejected(format!(
					"Order capacity of {} reached",
					capacity
				)));
			}
		}

		orders.push(order.clone());
		Ok(OrderReceipt {
			order_id: order.id.clone(),
			backend: Registry::NAME.to_string(),
			total: order.summary.total,
			accepted_at: current_timestamp(),
		})
	}
}

/// Configuration schema for MemorySubmission.
pub struct MemorySubmissionSchema;

impl ConfigSchema for MemorySubmissionSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![],
			vec![Field::new(
				"capacity",
				FieldType::Integer {
					min: Some(1),
					max: None,
				},
			)],
		);
		schema.validate(config)
	}
}

/// Factory function to create a memory submission backend from configuration.
///
/// Configuration parameters:
/// - `capacity` (optional): maximum number of orders to accept
pub fn create_submission(
	config: &toml::Value,
) -> Result<Box<dyn SubmissionInterface>, SubmissionError> {
	MemorySubmissionSchema
		.validate(config)
		.map_err(|e| SubmissionError::Configuration(e.to_string()))?;

	let backend = match config.get("capacity").and_then(|v| v.as_integer()) {
		Some(capacity) => MemorySubmission::with_capacity(capacity as usize),
		None => MemorySubmission::new(),
	};
	Ok(Box::new(backend))
}

/// Registry for the memory submission implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = SubmissionFactory;

	fn factory() -> Self::Factory {
		create_submission
	}
}

impl SubmissionRegistry for Registry {}
