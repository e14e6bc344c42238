//! Photo and size selection types.
//!
//! A photo carries the sizes chosen for it. The selection list keeps at most
//! one entry per size id and every quantity stays at or above one; the
//! mutators on [`Photo`] are the only way to change it.

use crate::SizeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Preview used for photos added without a real image.
pub const PLACEHOLDER_PREVIEW: &str = "/api/placeholder/150/150";

/// Smallest quantity a size selection can hold.
pub const MIN_QUANTITY: u32 = 1;

/// Identifier of a photo within one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(pub u32);

impl fmt::Display for PhotoId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<u32> for PhotoId {
	fn from(value: u32) -> Self {
		Self(value)
	}
}

/// Image metadata supplied by whatever acquired the photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoAsset {
	/// Label shown next to the photo. Not required to be unique.
	pub display_name: String,
	/// Opaque reference to a preview image.
	pub preview_ref: String,
}

impl PhotoAsset {
	pub fn new(display_name: impl Into<String>, preview_ref: impl Into<String>) -> Self {
		Self {
			display_name: display_name.into(),
			preview_ref: preview_ref.into(),
		}
	}

	/// Synthesised asset for a photo added without an upload.
	pub fn placeholder(id: PhotoId) -> Self {
		Self {
			display_name: format!("Photo {}.jpg", id),
			preview_ref: PLACEHOLDER_PREVIEW.to_string(),
		}
	}
}

/// A chosen print size and how many prints of it to make.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeSelection {
	pub size_id: SizeId,
	pub quantity: u32,
}

impl SizeSelection {
	fn new(size_id: SizeId) -> Self {
		Self {
			size_id,
			quantity: MIN_QUANTITY,
		}
	}
}

/// A user-added photo and its size selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Photo {
	pub id: PhotoId,
	pub display_name: String,
	pub preview_ref: String,
	size_selections: Vec<SizeSelection>,
}

impl Photo {
	/// Creates a photo with no size selections.
	pub fn new(id: PhotoId, asset: PhotoAsset) -> Self {
		Self {
			id,
			display_name: asset.display_name,
			preview_ref: asset.preview_ref,
			size_selections: Vec::new(),
		}
	}

	/// Selections in the order they were made.
	pub fn selections(&self) -> &[SizeSelection] {
		&self.size_selections
	}

	pub fn selection(&self, size_id: &SizeId) -> Option<&SizeSelection> {
		self.size_selections.iter().find(|s| &s.size_id == size_id)
	}

	pub fn has_selections(&self) -> bool {
		!self.size_selections.is_empty()
	}

	/// Adds the size with quantity one, or removes it if already selected.
	///
	/// Removing discards the accumulated quantity; selecting the size again
	/// starts over at one. Returns whether the size is selected afterwards.
	pub fn toggle_size(&mut self, size_id: SizeId) -> bool {
		match self
			.size_selections
			.iter()
			.position(|s| s.size_id == size_id)
		{
			Some(index) => {
				self.size_selections.remove(index);
				false
			},
			None => {
				self.size_selections.push(SizeSelection::new(size_id));
				true
			},
		}
	}

	/// Shifts the quantity of a selected size by `delta`, never below one.
	///
	/// Returns the new quantity, or `None` when the size is not selected.
	pub fn adjust_quantity(&mut self, size_id: &SizeId, delta: i64) -> Option<u32> {
		let selection = self
			.size_selections
			.iter_mut()
			.find(|s| &s.size_id == size_id)?;

		let next = i64::from(selection.quantity)
			.saturating_add(delta)
			.clamp(i64::from(MIN_QUANTITY), i64::from(u32::MAX));
		selection.quantity = next as u32;
		Some(selection.quantity)
	}

	/// Total number of prints ordered for this photo.
	pub fn print_count(&self) -> u64 {
		self.size_selections
			.iter()
			.map(|s| u64::from(s.quantity))
			.sum()
	}
}

impl<'de> Deserialize<'de> for Photo {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		#[derive(Deserialize)]
		struct RawPhoto {
			id: PhotoId,
			display_name: String,
			preview_ref: String,
			#[serde(default)]
			size_selections: Vec<SizeSelection>,
		}

		let raw = RawPhoto::deserialize(deserializer)?;
		for (index, selection) in raw.size_selections.iter().enumerate() {
			if selection.quantity < MIN_QUANTITY {
				return Err(serde::de::Error::custom(format!(
					"Photo {} selects {} with quantity {}, minimum is {}",
					raw.id, selection.size_id, selection.quantity, MIN_QUANTITY
				)));
			}
			if raw.size_selections[..index]
				.iter()
				.any(|earlier| earlier.size_id == selection.size_id)
			{
				return Err(serde::de::Error::custom(format!(
					"Photo {} selects {} more than once",
					raw.id, selection.size_id
				)));
			}
		}

		Ok(Self {
			id: raw.id,
			display_name: raw.display_name,
			preview_ref: raw.preview_ref,
			size_selections: raw.size_selections,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn photo() -> Photo {
		Photo::new(PhotoId(1), PhotoAsset::placeholder(PhotoId(1)))
	}

	#[test]
	fn test_placeholder_asset() {
		let asset = PhotoAsset::placeholder(PhotoId(3));
		assert_eq!(asset.display_name, "Photo 3.jpg");
		assert_eq!(asset.preview_ref, PLACEHOLDER_PREVIEW);
	}

	#[test]
	fn test_toggle_adds_then_removes() {
		let mut photo = photo();

		assert!(photo.toggle_size("4x6".into()));
		assert_eq!(photo.selection(&"4x6".into()).unwrap().quantity, 1);

		assert!(!photo.toggle_size("4x6".into()));
		assert!(photo.selections().is_empty());
	}

	#[test]
	fn test_toggle_keeps_one_entry_per_size() {
		let mut photo = photo();
		photo.toggle_size("4x6".into());
		photo.toggle_size("5x7".into());
		photo.toggle_size("5x7".into());
		photo.toggle_size("5x7".into());

		let ids: Vec<&str> = photo.selections().iter().map(|s| s.size_id.as_str()).collect();
		assert_eq!(ids, vec!["4x6", "5x7"]);
	}

	#[test]
	fn test_retoggle_resets_quantity() {
		let mut photo = photo();
		photo.toggle_size("4x6".into());
		photo.adjust_quantity(&"4x6".into(), 4);
		assert_eq!(photo.selection(&"4x6".into()).unwrap().quantity, 5);

		photo.toggle_size("4x6".into());
		photo.toggle_size("4x6".into());
		assert_eq!(photo.selection(&"4x6".into()).unwrap().quantity, 1);
	}

	#[test]
	fn test_adjust_quantity_floors_at_one() {
		let mut photo = photo();
		photo.toggle_size("4x6".into());

		assert_eq!(photo.adjust_quantity(&"4x6".into(), -1), Some(1));
		assert_eq!(photo.adjust_quantity(&"4x6".into(), 2), Some(3));
		assert_eq!(photo.adjust_quantity(&"4x6".into(), -10), Some(1));
		assert_eq!(photo.adjust_quantity(&"4x6".into(), i64::MIN), Some(1));
		assert_eq!(
			photo.adjust_quantity(&"4x6".into(), i64::MAX),
			Some(u32::MAX)
		);
	}

	#[test]
	fn test_adjust_unselected_size_is_noop() {
		let mut photo = photo();
		assert_eq!(photo.adjust_quantity(&"4x6".into(), 1), None);
		assert!(photo.selections().is_empty());
	}

	#[test]
	fn test_print_count() {
		let mut photo = photo();
		photo.toggle_size("4x6".into());
		photo.toggle_size("5x7".into());
		photo.adjust_quantity(&"5x7".into(), 2);
		assert_eq!(photo.print_count(), 4);
	}

	#[test]
	fn test_deserialize_round_trips_valid_photo() {
		let mut original = photo();
		original.toggle_size("4x6".into());
		original.adjust_quantity(&"4x6".into(), 2);

		let json = serde_json::to_string(&original).unwrap();
		let parsed: Photo = serde_json::from_str(&json).unwrap();
		assert_eq!(parsed, original);
	}

	#[test]
	fn test_deserialize_rejects_broken_selections() {
		let zero = r#"{"id":1,"display_name":"a.jpg","preview_ref":"p",
			"size_selections":[{"size_id":"4x6","quantity":0}]}"#;
		let err = serde_json::from_str::<Photo>(zero).unwrap_err();
		assert!(err.to_string().contains("quantity 0"));

		let duplicate = r#"{"id":1,"display_name":"a.jpg","preview_ref":"p",
			"size_selections":[{"size_id":"4x6","quantity":1},{"size_id":"4x6","quantity":2}]}"#;
		let err = serde_json::from_str::<Photo>(duplicate).unwrap_err();
		assert!(err.to_string().contains("more than once"));
	}
}
