//! Selection store for photos and their print sizes.
//!
//! The store owns the photo list of one session. Photos are append-only and
//! receive ids in insertion order. Size selections are toggled on and off
//! per photo and quantities are adjusted in place. Requests naming a photo or
//! selection that does not exist are ignored; requests naming a size outside
//! the catalog are rejected.

use crate::pricing::{self, PricingError};
use print_types::{
	OrderState, Photo, PhotoAsset, PhotoId, PrintSizeCatalog, SizeId, SizeSelection, WizardStep,
};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur when changing selections.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
	#[error("Unknown print size: {0}")]
	UnknownSize(SizeId),
}

/// Result of toggling a size on a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
	/// The size was added with quantity one.
	Selected,
	/// The size was removed along with its quantity.
	Deselected,
	/// No photo has the requested id; nothing changed.
	PhotoNotFound,
}

/// Photos of one session together with the catalog and tax rate that price
/// them.
#[derive(Debug, Clone)]
pub struct SelectionStore {
	catalog: PrintSizeCatalog,
	tax_rate: Decimal,
	photos: Vec<Photo>,
}

impl SelectionStore {
	pub fn new(catalog: PrintSizeCatalog, tax_rate: Decimal) -> Self {
		Self {
			catalog,
			tax_rate,
			photos: Vec::new(),
		}
	}

	pub fn catalog(&self) -> &PrintSizeCatalog {
		&self.catalog
	}

	pub fn tax_rate(&self) -> Decimal {
		self.tax_rate
	}

	/// Appends a placeholder photo and returns its id.
	pub fn add_photo(&mut self) -> PhotoId {
		let id = self.next_id();
		self.push(Photo::new(id, PhotoAsset::placeholder(id)))
	}

	/// Appends a photo supplied by an acquisition mechanism.
	pub fn add_photo_with(&mut self, asset: PhotoAsset) -> PhotoId {
		let id = self.next_id();
		self.push(Photo::new(id, asset))
	}

	fn next_id(&self) -> PhotoId {
		// Photos are never removed, so the count is a safe id source.
		PhotoId(self.photos.len() as u32 + 1)
	}

	fn push(&mut self, photo: Photo) -> PhotoId {
		let id = photo.id;
		tracing::debug!(photo_id = %id, name = %photo.display_name, "Photo added");
		self.photos.push(photo);
		id
	}

	/// Selects `size_id` on the photo, or deselects it if already selected.
	pub fn toggle_size(
		&mut self,
		photo_id: PhotoId,
		size_id: &SizeId,
	) -> Result<ToggleOutcome, SelectionError> {
		if !self.catalog.contains(size_id) {
			tracing::warn!(photo_id = %photo_id, size_id = %size_id, "Rejected unknown print size");
			return Err(SelectionError::UnknownSize(size_id.clone()));
		}

		let Some(photo) = self.photo_mut(photo_id) else {
			tracing::warn!(photo_id = %photo_id, size_id = %size_id, "Ignored toggle for missing photo");
			return Ok(ToggleOutcome::PhotoNotFound);
		};

		let outcome = if photo.toggle_size(size_id.clone()) {
			ToggleOutcome::Selected
		} else {
			ToggleOutcome::Deselected
		};
		tracing::debug!(photo_id = %photo_id, size_id = %size_id, ?outcome, "Size toggled");
		Ok(outcome)
	}

	/// Shifts a selection's quantity by `delta`, never below one.
	///
	/// Returns the new quantity, or `None` when the photo or the selection
	/// does not exist.
	pub fn adjust_quantity(&mut self, photo_id: PhotoId, size_id: &SizeId, delta: i64) -> Option<u32> {
		let quantity = self
			.photo_mut(photo_id)
			.and_then(|photo| photo.adjust_quantity(size_id, delta));

		match quantity {
			Some(quantity) => {
				tracing::debug!(photo_id = %photo_id, size_id = %size_id, delta, quantity, "Quantity adjusted");
			},
			None => {
				tracing::warn!(photo_id = %photo_id, size_id = %size_id, "Ignored quantity change for missing selection");
			},
		}
		quantity
	}

	pub fn photos(&self) -> &[Photo] {
		&self.photos
	}

	pub fn photo(&self, photo_id: PhotoId) -> Option<&Photo> {
		self.photos.iter().find(|photo| photo.id == photo_id)
	}

	fn photo_mut(&mut self, photo_id: PhotoId) -> Option<&mut Photo> {
		self.photos.iter_mut().find(|photo| photo.id == photo_id)
	}

	/// The selection rendered by a quantity control, if present.
	pub fn selection(&self, photo_id: PhotoId, size_id: &SizeId) -> Option<&SizeSelection> {
		self.photo(photo_id)?.selection(size_id)
	}

	/// Copies the photos into an order state at the given step.
	pub fn snapshot(&self, current_step: WizardStep) -> OrderState {
		OrderState {
			photos: self.photos.clone(),
			current_step,
		}
	}

	pub fn subtotal(&self) -> Result<Decimal, PricingError> {
		pricing::subtotal(&self.photos, &self.catalog)
	}

	pub fn tax(&self, subtotal: Decimal) -> Result<Decimal, PricingError> {
		pricing::tax(subtotal, self.tax_rate)
	}

	pub fn total(&self) -> Result<Decimal, PricingError> {
		let subtotal = self.subtotal()?;
		pricing::total(subtotal, self.tax(subtotal)?)
	}

	pub fn print_count(&self) -> u64 {
		pricing::print_count(&self.photos)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use print_types::PrintSize;

	fn store() -> SelectionStore {
		let catalog = PrintSizeCatalog::new(vec![
			PrintSize::new("4x6", "10 x 15 inches", Decimal::new(99, 2)),
			PrintSize::new("5x7", "15 x 20 inches", Decimal::new(199, 2)),
		])
		.unwrap();
		SelectionStore::new(catalog, Decimal::new(13, 2))
	}

	fn size(id: &str) -> SizeId {
		SizeId::from(id)
	}

	#[test]
	fn test_add_photo_assigns_sequential_ids() {
		let mut store = store();
		let ids: Vec<PhotoId> = (0..4).map(|_| store.add_photo()).collect();

		assert_eq!(ids, vec![PhotoId(1), PhotoId(2), PhotoId(3), PhotoId(4)]);
		assert_eq!(store.photos().len(), 4);
		assert_eq!(store.photos()[2].display_name, "Photo 3.jpg");
		assert!(store.photos().iter().all(|photo| !photo.has_selections()));
	}

	#[test]
	fn test_add_photo_with_asset() {
		let mut store = store();
		store.add_photo();
		let id = store.add_photo_with(PhotoAsset::new("beach.jpg", "blob:beach"));

		assert_eq!(id, PhotoId(2));
		let photo = store.photo(id).unwrap();
		assert_eq!(photo.display_name, "beach.jpg");
		assert_eq!(photo.preview_ref, "blob:beach");
	}

	#[test]
	fn test_single_size_scenario() {
		let mut store = store();
		let id = store.add_photo();
		assert_eq!(store.toggle_size(id, &size("4x6")), Ok(ToggleOutcome::Selected));

		let subtotal = store.subtotal().unwrap();
		assert_eq!(subtotal, Decimal::new(99, 2));
		assert_eq!(store.tax(subtotal), Ok(Decimal::new(1287, 4)));
		assert_eq!(store.total().unwrap(), Decimal::new(112, 2));
		assert_eq!(store.print_count(), 1);
	}

	#[test]
	fn test_quantity_scenario() {
		let mut store = store();
		let id = store.add_photo();
		store.toggle_size(id, &size("4x6")).unwrap();
		store.adjust_quantity(id, &size("4x6"), 1);
		assert_eq!(store.adjust_quantity(id, &size("4x6"), 1), Some(3));

		assert_eq!(store.subtotal().unwrap(), Decimal::new(297, 2));
		assert_eq!(store.print_count(), 3);
	}

	#[test]
	fn test_two_sizes_scenario() {
		let mut store = store();
		let id = store.add_photo();
		store.toggle_size(id, &size("4x6")).unwrap();
		store.toggle_size(id, &size("5x7")).unwrap();

		assert_eq!(store.subtotal().unwrap(), Decimal::new(298, 2));
	}

	#[test]
	fn test_toggle_off_removes_contribution() {
		let mut store = store();
		let first = store.add_photo();
		let second = store.add_photo();
		store.toggle_size(first, &size("5x7")).unwrap();
		let before = store.subtotal().unwrap();

		store.toggle_size(second, &size("4x6")).unwrap();
		assert_eq!(store.subtotal().unwrap() - before, Decimal::new(99, 2));

		assert_eq!(
			store.toggle_size(second, &size("4x6")),
			Ok(ToggleOutcome::Deselected)
		);
		assert!(store.photo(second).unwrap().selections().is_empty());
		assert_eq!(store.subtotal().unwrap(), before);
	}

	#[test]
	fn test_retoggle_starts_at_one() {
		let mut store = store();
		let id = store.add_photo();
		store.toggle_size(id, &size("4x6")).unwrap();
		store.adjust_quantity(id, &size("4x6"), 5);
		store.toggle_size(id, &size("4x6")).unwrap();
		store.toggle_size(id, &size("4x6")).unwrap();

		assert_eq!(store.selection(id, &size("4x6")).unwrap().quantity, 1);
	}

	#[test]
	fn test_quantity_never_below_one() {
		let mut store = store();
		let id = store.add_photo();
		store.toggle_size(id, &size("4x6")).unwrap();

		assert_eq!(store.adjust_quantity(id, &size("4x6"), -1), Some(1));
		assert_eq!(store.adjust_quantity(id, &size("4x6"), 2), Some(3));
		assert_eq!(store.adjust_quantity(id, &size("4x6"), -100), Some(1));
		assert_eq!(store.adjust_quantity(id, &size("4x6"), i64::MIN), Some(1));
	}

	#[test]
	fn test_mismatches_are_ignored() {
		let mut store = store();
		let id = store.add_photo();

		assert_eq!(
			store.toggle_size(PhotoId(9), &size("4x6")),
			Ok(ToggleOutcome::PhotoNotFound)
		);
		assert_eq!(store.adjust_quantity(id, &size("4x6"), 1), None);
		assert_eq!(store.adjust_quantity(PhotoId(9), &size("4x6"), 1), None);
		assert_eq!(store.subtotal().unwrap(), Decimal::ZERO);
	}

	#[test]
	fn test_unknown_size_rejected() {
		let mut store = store();
		let id = store.add_photo();

		assert_eq!(
			store.toggle_size(id, &size("8x10")),
			Err(SelectionError::UnknownSize(size("8x10")))
		);
		assert!(!store.photo(id).unwrap().has_selections());
	}

	#[test]
	fn test_snapshot_copies_photos() {
		let mut store = store();
		let id = store.add_photo();
		let snapshot = store.snapshot(WizardStep::ChooseSizes);
		store.toggle_size(id, &size("4x6")).unwrap();

		assert_eq!(snapshot.current_step, WizardStep::ChooseSizes);
		assert!(!snapshot.photo(id).unwrap().has_selections());
	}

	#[test]
	fn test_huge_quantity_reports_overflow() {
		let catalog = PrintSizeCatalog::new(vec![PrintSize::new(
			"poster",
			"Poster",
			Decimal::from(17_000_000_000_000_000_000u64),
		)])
		.unwrap();
		let mut store = SelectionStore::new(catalog, Decimal::new(13, 2));
		let id = store.add_photo();
		store.toggle_size(id, &size("poster")).unwrap();
		store.adjust_quantity(id, &size("poster"), i64::MAX);

		assert!(store.subtotal().is_ok());
		assert_eq!(store.total(), Err(PricingError::Overflow));
	}
}
