//! Builder for assembling a checkout from configuration.
//!
//! Creates the submission backend named as primary in the configuration and
//! an unstarted session priced by the configured catalog.

use crate::{CheckoutError, CheckoutSession};
use print_config::Config;
use print_submission::SubmissionService;
use print_types::OrderReceipt;
use thiserror::Error;

/// Errors that can occur while assembling a checkout.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
}

/// A session together with the backend its orders go to.
pub struct Checkout {
	pub session: CheckoutSession,
	pub submission: SubmissionService,
}

impl Checkout {
	/// Places the session's order with the configured backend.
	pub async fn place_order(&mut self) -> Result<OrderReceipt, CheckoutError> {
		self.session.place_order(&self.submission).await
	}
}

/// Builder for constructing a [`Checkout`] from a [`Config`].
pub struct CheckoutBuilder {
	config: Config,
}

impl CheckoutBuilder {
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	pub fn build(self) -> Result<Checkout, BuilderError> {
		let primary = &self.config.submission.primary;
		let submission =
			SubmissionService::from_config(primary, &self.config.submission.implementations)
				.map_err(|e| {
					tracing::error!(
						component = "submission",
						implementation = %primary,
						error = %e,
						"Failed to create submission implementation"
					);
					BuilderError::Config(format!(
						"Failed to create submission implementation '{}': {}",
						primary, e
					))
				})?;
		tracing::info!(component = "submission", implementation = %primary, "Loaded");

		let session = CheckoutSession::new(&self.config);
		tracing::info!(
			shop = %session.shop_name(),
			sizes = session.catalog().len(),
			"Checkout ready"
		);
		Ok(Checkout {
			session,
			submission,
		})
	}
}
