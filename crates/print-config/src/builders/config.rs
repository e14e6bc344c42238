//! Configuration builder for creating test and development configurations.

use crate::{Config, ConfigError, PricingConfig, ShippingConfig, ShopConfig, SubmissionConfig};
use print_types::{Country, PrintSize, PrintSizeCatalog};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Builder for creating `Config` instances with a fluent API.
///
/// Defaults to a single `4x6` size at 0.99, 13% tax, every supported
/// shipping country and in-memory submission.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	shop_name: String,
	currency: String,
	tax_rate: Decimal,
	sizes: Vec<PrintSize>,
	countries: Vec<Country>,
	submission_primary: String,
	submission_implementations: HashMap<String, toml::Value>,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	/// Creates a new `ConfigBuilder` with default values suitable for testing.
	pub fn new() -> Self {
		let mut submission_implementations = HashMap::new();
		submission_implementations.insert(
			"memory".to_string(),
			toml::Value::Table(toml::map::Map::new()),
		);

		Self {
			shop_name: "test-shop".to_string(),
			currency: "$".to_string(),
			tax_rate: Decimal::new(13, 2),
			sizes: vec![PrintSize::new(
				"4x6",
				"10 x 15 inches",
				Decimal::new(99, 2),
			)],
			countries: Country::ALL.to_vec(),
			submission_primary: "memory".to_string(),
			submission_implementations,
		}
	}

	pub fn shop_name(mut self, name: String) -> Self {
		self.shop_name = name;
		self
	}

	pub fn currency(mut self, currency: String) -> Self {
		self.currency = currency;
		self
	}

	pub fn tax_rate(mut self, rate: Decimal) -> Self {
		self.tax_rate = rate;
		self
	}

	/// Replaces the catalog entries.
	pub fn sizes(mut self, sizes: Vec<PrintSize>) -> Self {
		self.sizes = sizes;
		self
	}

	pub fn countries(mut self, countries: Vec<Country>) -> Self {
		self.countries = countries;
		self
	}

	/// Adds a submission implementation and makes it the primary.
	pub fn submission(mut self, name: String, config: toml::Value) -> Self {
		self.submission_implementations.insert(name.clone(), config);
		self.submission_primary = name;
		self
	}

	/// Builds and validates the configuration.
	pub fn build(self) -> Result<Config, ConfigError> {
		let catalog = PrintSizeCatalog::new(self.sizes.clone())
			.map_err(|e| ConfigError::Validation(e.to_string()))?;
		let config = self.assemble(catalog);
		config.validate()?;
		Ok(config)
	}

	fn assemble(self, catalog: PrintSizeCatalog) -> Config {
		Config {
			shop: ShopConfig {
				name: self.shop_name,
				currency: self.currency,
			},
			pricing: PricingConfig {
				tax_rate: self.tax_rate,
				sizes: catalog,
			},
			shipping: ShippingConfig {
				countries: self.countries,
			},
			submission: SubmissionConfig {
				primary: self.submission_primary,
				implementations: self.submission_implementations,
			},
		}
	}
}
