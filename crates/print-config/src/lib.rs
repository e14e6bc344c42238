//! Configuration module for the print-order checkout.
//!
//! This module provides the structures that describe a storefront: its name
//! and currency, the print size catalog and tax rate, the countries it ships
//! to and the backend that receives placed orders. Configuration is loaded
//! from TOML, environment variables are interpolated and the result is
//! validated before use.
//!
//! ## Modular Configuration Support
//!
//! Configurations can be split into multiple files:
//! - Use `include = ["pricing.toml", "shipping.toml"]` to include other files
//! - Each top-level section must be unique across all files

pub mod builders {
	pub mod config;
}
mod loader;

pub use builders::config::ConfigBuilder;

use print_types::{Country, PrintSize, PrintSizeCatalog};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for a storefront.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Storefront identity.
	pub shop: ShopConfig,
	/// Tax rate and print size catalog.
	pub pricing: PricingConfig,
	/// Countries the shop ships to.
	#[serde(default)]
	pub shipping: ShippingConfig,
	/// Backend that receives placed orders.
	pub submission: SubmissionConfig,
}

/// Storefront identity.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShopConfig {
	/// Display name of the shop.
	pub name: String,
	/// Symbol prefixed to every displayed amount.
	#[serde(default = "default_currency")]
	pub currency: String,
}

/// Pricing policy for the shop.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PricingConfig {
	/// Fraction of the subtotal charged as tax, between 0 and 1.
	/// Defaults to 0.13 if not specified.
	#[serde(default = "default_tax_rate")]
	pub tax_rate: Decimal,
	/// Print sizes on offer, in display order.
	pub sizes: PrintSizeCatalog,
}

/// Shipping policy for the shop.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShippingConfig {
	/// Countries an order can be shipped to.
	#[serde(default = "default_countries")]
	pub countries: Vec<Country>,
}

impl ShippingConfig {
	/// Returns true when the shop ships to the given country.
	pub fn ships_to(&self, country: Country) -> bool {
		self.countries.contains(&country)
	}
}

impl Default for ShippingConfig {
	fn default() -> Self {
		Self {
			countries: default_countries(),
		}
	}
}

/// Configuration for order submission.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubmissionConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of submission implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

fn default_currency() -> String {
	"$".to_string()
}

/// Returns the default tax rate of 13%.
fn default_tax_rate() -> Decimal {
	Decimal::new(13, 2)
}

fn default_countries() -> Vec<Country> {
	Country::ALL.to_vec()
}

/// Substitutes `${NAME}` and `${NAME:-fallback}` with environment values.
///
/// A variable that is unset and has no fallback is an error. Input is
/// capped at 1MB.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let pattern = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut missing = None;
	let resolved = pattern.replace_all(input, |caps: &regex::Captures<'_>| {
		let name = &caps[1];
		std::env::var(name)
			.ok()
			.or_else(|| caps.get(2).map(|fallback| fallback.as_str().to_string()))
			.unwrap_or_else(|| {
				missing.get_or_insert_with(|| name.to_string());
				String::new()
			})
	});

	match missing {
		Some(name) => Err(ConfigError::Validation(format!(
			"Environment variable '{}' not found",
			name
		))),
		None => Ok(resolved.into_owned()),
	}
}

impl Config {
	/// Loads configuration from a file, following `include` directives.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let path_buf = Path::new(path);
		let base_dir = path_buf.parent().unwrap_or_else(|| Path::new("."));

		let mut loader = loader::ConfigLoader::new(base_dir);
		let file_name = path_buf
			.file_name()
			.ok_or_else(|| ConfigError::Validation(format!("Invalid path: {}", path)))?;
		let config = loader.load_config(file_name).await?;

		tracing::info!(
			shop = %config.shop.name,
			sizes = config.pricing.sizes.len(),
			tax_rate = %config.pricing.tax_rate,
			"Loaded configuration"
		);
		Ok(config)
	}

	/// Configuration of the reference storefront.
	///
	/// Two sizes (`4x6` at 0.99 and `5x7` at 1.99), 13% tax, ten shipping
	/// countries and in-memory order submission.
	pub fn reference() -> Result<Self, ConfigError> {
		let sizes = vec![
			PrintSize::new("4x6", "10 x 15 inches", Decimal::new(99, 2)),
			PrintSize::new("5x7", "15 x 20 inches", Decimal::new(199, 2)),
		];
		ConfigBuilder::new()
			.shop_name("freezePIX".to_string())
			.sizes(sizes)
			.build()
	}

	/// Returns the print size catalog.
	pub fn catalog(&self) -> &PrintSizeCatalog {
		&self.pricing.sizes
	}

	/// Validates the configuration to ensure all required fields are properly set.
	///
	/// The catalog validates itself when deserialized; this checks the
	/// remaining cross-field rules:
	/// - Shop name is not empty
	/// - Tax rate lies between 0 and 1
	/// - At least one shipping country
	/// - Submission primary names a configured implementation
	fn validate(&self) -> Result<(), ConfigError> {
		if self.shop.name.trim().is_empty() {
			return Err(ConfigError::Validation("Shop name cannot be empty".into()));
		}

		let rate = self.pricing.tax_rate;
		if rate < Decimal::ZERO || rate > Decimal::ONE {
			return Err(ConfigError::Validation(format!(
				"Tax rate must be between 0 and 1, got {}",
				rate
			)));
		}

		if self.shipping.countries.is_empty() {
			return Err(ConfigError::Validation(
				"At least one shipping country must be configured".into(),
			));
		}

		if self.submission.implementations.is_empty() {
			return Err(ConfigError::Validation(
				"At least one submission implementation must be configured".into(),
			));
		}
		if self.submission.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Submission primary implementation cannot be empty".into(),
			));
		}
		if !self
			.submission
			.implementations
			.contains_key(&self.submission.primary)
		{
			return Err(ConfigError::Validation(format!(
				"Primary submission '{}' not found in implementations. Available: {:?}",
				self.submission.primary,
				self.submission.implementations.keys().collect::<Vec<_>>()
			)));
		}

		Ok(())
	}
}

/// Parses configuration from a TOML string.
///
/// Environment variables are resolved and the configuration is validated
/// after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
