//! Order types for the checkout.
//!
//! This module defines the order state snapshot read by the presentation
//! layer, the derived price summary, the shipping details collected at the
//! last step and the order handed to a submission backend.

use crate::{Photo, PhotoId, SizeId, WizardStep};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Immutable view of a session's order at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderState {
	/// Photos in insertion order.
	pub photos: Vec<Photo>,
	/// Current wizard position.
	pub current_step: WizardStep,
}

impl OrderState {
	pub fn photo(&self, id: PhotoId) -> Option<&Photo> {
		self.photos.iter().find(|photo| photo.id == id)
	}
}

/// One size line of a photo in the order summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
	pub size_id: SizeId,
	pub label: String,
	pub quantity: u32,
	pub unit_price: Decimal,
	/// `unit_price * quantity`, unrounded.
	pub amount: Decimal,
}

/// The items ordered for one photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
	pub photo_id: PhotoId,
	pub display_name: String,
	pub preview_ref: String,
	pub items: Vec<LineItem>,
}

/// Price figures derived from an order state.
///
/// `subtotal` and `tax` are exact; only `total` is rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
	pub subtotal: Decimal,
	pub tax_rate: Decimal,
	pub tax: Decimal,
	pub total: Decimal,
	pub print_count: u64,
	pub lines: Vec<OrderLine>,
}

/// Countries a shipping address can be in.
///
/// The shop configuration narrows this down to the countries it ships to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
	#[serde(rename = "US")]
	UnitedStates,
	#[serde(rename = "CA")]
	Canada,
	#[serde(rename = "GB")]
	UnitedKingdom,
	#[serde(rename = "AU")]
	Australia,
	#[serde(rename = "FR")]
	France,
	#[serde(rename = "DE")]
	Germany,
	#[serde(rename = "IT")]
	Italy,
	#[serde(rename = "ES")]
	Spain,
	#[serde(rename = "NL")]
	Netherlands,
	#[serde(rename = "BE")]
	Belgium,
}

impl Country {
	pub const ALL: [Country; 10] = [
		Country::UnitedStates,
		Country::Canada,
		Country::UnitedKingdom,
		Country::Australia,
		Country::France,
		Country::Germany,
		Country::Italy,
		Country::Spain,
		Country::Netherlands,
		Country::Belgium,
	];

	/// ISO 3166-1 alpha-2 code.
	pub fn code(self) -> &'static str {
		match self {
			Self::UnitedStates => "US",
			Self::Canada => "CA",
			Self::UnitedKingdom => "GB",
			Self::Australia => "AU",
			Self::France => "FR",
			Self::Germany => "DE",
			Self::Italy => "IT",
			Self::Spain => "ES",
			Self::Netherlands => "NL",
			Self::Belgium => "BE",
		}
	}

	pub fn name(self) -> &'static str {
		match self {
			Self::UnitedStates => "United States",
			Self::Canada => "Canada",
			Self::UnitedKingdom => "United Kingdom",
			Self::Australia => "Australia",
			Self::France => "France",
			Self::Germany => "Germany",
			Self::Italy => "Italy",
			Self::Spain => "Spain",
			Self::Netherlands => "Netherlands",
			Self::Belgium => "Belgium",
		}
	}
}

impl fmt::Display for Country {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Error returned when parsing a country or shipping field name fails.
#[derive(Debug, Error, PartialEq)]
pub enum ShippingParseError {
	#[error("Unknown country code: {0}")]
	UnknownCountry(String),
	#[error("Unknown shipping field: {0}")]
	UnknownField(String),
}

impl FromStr for Country {
	type Err = ShippingParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let code = s.trim().to_ascii_uppercase();
		Country::ALL
			.into_iter()
			.find(|country| country.code() == code)
			.ok_or_else(|| ShippingParseError::UnknownCountry(s.to_string()))
	}
}

/// Fields of the shipping form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShippingField {
	FirstName,
	LastName,
	AddressLine1,
	City,
	PostalCode,
	Country,
}

impl ShippingField {
	pub const ALL: [ShippingField; 6] = [
		ShippingField::FirstName,
		ShippingField::LastName,
		ShippingField::AddressLine1,
		ShippingField::City,
		ShippingField::PostalCode,
		ShippingField::Country,
	];

	/// Form placeholder text.
	pub fn label(self) -> &'static str {
		match self {
			Self::FirstName => "First Name",
			Self::LastName => "Last Name",
			Self::AddressLine1 => "Address Line 1",
			Self::City => "City",
			Self::PostalCode => "Postal Code",
			Self::Country => "Country",
		}
	}

	/// Key used to address the field in commands and logs.
	pub fn key(self) -> &'static str {
		match self {
			Self::FirstName => "first_name",
			Self::LastName => "last_name",
			Self::AddressLine1 => "address_line1",
			Self::City => "city",
			Self::PostalCode => "postal_code",
			Self::Country => "country",
		}
	}
}

impl fmt::Display for ShippingField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

impl FromStr for ShippingField {
	type Err = ShippingParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let key = s.trim().to_ascii_lowercase();
		ShippingField::ALL
			.into_iter()
			.find(|field| field.key() == key)
			.ok_or_else(|| ShippingParseError::UnknownField(s.to_string()))
	}
}

/// Shipping address entered at the last wizard step.
///
/// Fields may be filled in any order and left blank while the user types;
/// completeness is only checked when the order is placed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShippingDetails {
	pub first_name: String,
	pub last_name: String,
	pub address_line1: String,
	pub city: String,
	pub postal_code: String,
	pub country: Option<Country>,
}

impl ShippingDetails {
	/// Sets a text field, or the country when `field` is
	/// [`ShippingField::Country`].
	pub fn set(&mut self, field: ShippingField, value: &str) -> Result<(), ShippingParseError> {
		let value = value.trim().to_string();
		match field {
			ShippingField::FirstName => self.first_name = value,
			ShippingField::LastName => self.last_name = value,
			ShippingField::AddressLine1 => self.address_line1 = value,
			ShippingField::City => self.city = value,
			ShippingField::PostalCode => self.postal_code = value,
			ShippingField::Country => {
				self.country = if value.is_empty() {
					None
				} else {
					Some(value.parse()?)
				}
			},
		}
		Ok(())
	}

	/// Current value of a field as displayed in the form.
	pub fn get(&self, field: ShippingField) -> &str {
		match field {
			ShippingField::FirstName => &self.first_name,
			ShippingField::LastName => &self.last_name,
			ShippingField::AddressLine1 => &self.address_line1,
			ShippingField::City => &self.city,
			ShippingField::PostalCode => &self.postal_code,
			ShippingField::Country => self.country.map(Country::code).unwrap_or(""),
		}
	}

	/// Fields that are still blank.
	pub fn missing_fields(&self) -> Vec<ShippingField> {
		ShippingField::ALL
			.into_iter()
			.filter(|field| self.get(*field).is_empty())
			.collect()
	}
}

/// An order handed to a submission backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedOrder {
	/// Unique identifier assigned at placement.
	pub id: String,
	/// Unix timestamp of placement, in seconds.
	pub placed_at: u64,
	/// Photos with their size selections.
	pub photos: Vec<Photo>,
	/// Price figures at placement time.
	pub summary: OrderSummary,
	/// Where to send the prints.
	pub shipping: ShippingDetails,
}

/// Acknowledgement returned by a submission backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReceipt {
	pub order_id: String,
	/// Name of the backend that accepted the order.
	pub backend: String,
	pub total: Decimal,
	pub accepted_at: u64,
}
