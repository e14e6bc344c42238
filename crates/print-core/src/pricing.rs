//! Price queries over an order state.
//!
//! Every figure is recomputed from the photos it is given; nothing is cached
//! between calls. Amounts accumulate exactly and only the total is rounded.

use print_types::{
	round_money, LineItem, OrderLine, OrderState, OrderSummary, Photo, PrintSizeCatalog, SizeId,
};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while pricing an order.
///
/// Selections are validated against the catalog when made, so these signal
/// a state that should not exist rather than bad input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
	#[error("No catalog entry for selected size {0}")]
	MissingCatalogEntry(SizeId),
	#[error("Amount overflowed while pricing the order")]
	Overflow,
}

/// Sum of `unit_price * quantity` over every selection.
pub fn subtotal(photos: &[Photo], catalog: &PrintSizeCatalog) -> Result<Decimal, PricingError> {
	photos
		.iter()
		.flat_map(|photo| photo.selections())
		.try_fold(Decimal::ZERO, |sum, selection| {
			let amount = line_amount(catalog, &selection.size_id, selection.quantity)?;
			sum.checked_add(amount).ok_or(PricingError::Overflow)
		})
}

/// Tax owed on `subtotal`, unrounded.
pub fn tax(subtotal: Decimal, rate: Decimal) -> Result<Decimal, PricingError> {
	subtotal.checked_mul(rate).ok_or(PricingError::Overflow)
}

/// Amount to charge, rounded to cents.
pub fn total(subtotal: Decimal, tax: Decimal) -> Result<Decimal, PricingError> {
	subtotal
		.checked_add(tax)
		.map(round_money)
		.ok_or(PricingError::Overflow)
}

/// Number of prints across all photos and sizes.
pub fn print_count(photos: &[Photo]) -> u64 {
	photos.iter().map(Photo::print_count).sum()
}

fn line_amount(
	catalog: &PrintSizeCatalog,
	size_id: &SizeId,
	quantity: u32,
) -> Result<Decimal, PricingError> {
	let unit_price = catalog
		.unit_price(size_id)
		.ok_or_else(|| PricingError::MissingCatalogEntry(size_id.clone()))?;
	unit_price
		.checked_mul(Decimal::from(quantity))
		.ok_or(PricingError::Overflow)
}

/// Builds the review figures for an order state.
///
/// Photos without selections contribute no line.
pub fn summarize(
	state: &OrderState,
	catalog: &PrintSizeCatalog,
	tax_rate: Decimal,
) -> Result<OrderSummary, PricingError> {
	let mut lines = Vec::new();
	for photo in state.photos.iter().filter(|photo| photo.has_selections()) {
		let items = photo
			.selections()
			.iter()
			.map(|selection| {
				let size = catalog
					.get(&selection.size_id)
					.ok_or_else(|| PricingError::MissingCatalogEntry(selection.size_id.clone()))?;
				Ok(LineItem {
					size_id: size.id.clone(),
					label: size.label.clone(),
					quantity: selection.quantity,
					unit_price: size.unit_price,
					amount: line_amount(catalog, &selection.size_id, selection.quantity)?,
				})
			})
			.collect::<Result<Vec<_>, PricingError>>()?;

		lines.push(OrderLine {
			photo_id: photo.id,
			display_name: photo.display_name.clone(),
			preview_ref: photo.preview_ref.clone(),
			items,
		});
	}

	let subtotal = subtotal(&state.photos, catalog)?;
	let tax = tax(subtotal, tax_rate)?;
	Ok(OrderSummary {
		subtotal,
		tax_rate,
		tax,
		total: total(subtotal, tax)?,
		print_count: print_count(&state.photos),
		lines,
	})
}
