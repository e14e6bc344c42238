//! Print size catalog types.
//!
//! The catalog is the closed list of print sizes a shop offers. It is loaded
//! once from configuration and never changes for the lifetime of a session,
//! so every size id referenced by a selection can be checked against it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Errors that can occur while assembling a catalog.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
	/// The catalog has no sizes at all.
	#[error("Catalog must contain at least one print size")]
	Empty,
	/// Two entries share the same size id.
	#[error("Duplicate print size id: {0}")]
	DuplicateSize(SizeId),
	/// A size id is blank.
	#[error("Print size id cannot be empty")]
	EmptyId,
	/// A unit price is below zero.
	#[error("Print size {id} has a negative unit price: {price}")]
	NegativePrice { id: SizeId, price: Decimal },
}

/// Identifier of a print size, such as `4x6`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SizeId(pub String);

impl SizeId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for SizeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for SizeId {
	fn from(value: &str) -> Self {
		Self(value.to_string())
	}
}

impl From<String> for SizeId {
	fn from(value: String) -> Self {
		Self(value)
	}
}

/// A single entry of the print size catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintSize {
	/// Unique size code.
	pub id: SizeId,
	/// Human-readable dimensions, e.g. "10 x 15 inches".
	pub label: String,
	/// Price of a single print of this size.
	pub unit_price: Decimal,
}

impl PrintSize {
	pub fn new(id: impl Into<SizeId>, label: impl Into<String>, unit_price: Decimal) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			unit_price,
		}
	}
}

/// The closed, ordered list of print sizes available for ordering.
///
/// Construction validates that ids are unique and non-empty and that no
/// price is negative. Entries keep their configured order, which is the
/// order sizes are offered in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PrintSizeCatalog {
	sizes: Vec<PrintSize>,
}

impl PrintSizeCatalog {
	/// Creates a catalog from the given entries.
	pub fn new(sizes: Vec<PrintSize>) -> Result<Self, CatalogError> {
		if sizes.is_empty() {
			return Err(CatalogError::Empty);
		}

		let mut seen = HashSet::new();
		for size in &sizes {
			if size.id.as_str().trim().is_empty() {
				return Err(CatalogError::EmptyId);
			}
			if !seen.insert(size.id.clone()) {
				return Err(CatalogError::DuplicateSize(size.id.clone()));
			}
			if size.unit_price < Decimal::ZERO {
				return Err(CatalogError::NegativePrice {
					id: size.id.clone(),
					price: size.unit_price,
				});
			}
		}

		Ok(Self { sizes })
	}

	/// Looks up a size by id.
	pub fn get(&self, id: &SizeId) -> Option<&PrintSize> {
		self.sizes.iter().find(|size| &size.id == id)
	}

	/// Returns true when the catalog offers the given size.
	pub fn contains(&self, id: &SizeId) -> bool {
		self.get(id).is_some()
	}

	/// Unit price of the given size, if offered.
	pub fn unit_price(&self, id: &SizeId) -> Option<Decimal> {
		self.get(id).map(|size| size.unit_price)
	}

	pub fn sizes(&self) -> &[PrintSize] {
		&self.sizes
	}

	pub fn iter(&self) -> impl Iterator<Item = &PrintSize> {
		self.sizes.iter()
	}

	pub fn len(&self) -> usize {
		self.sizes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.sizes.is_empty()
	}
}

impl<'de> Deserialize<'de> for PrintSizeCatalog {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		let sizes = Vec::<PrintSize>::deserialize(deserializer)?;
		PrintSizeCatalog::new(sizes).map_err(serde::de::Error::custom)
	}
}
