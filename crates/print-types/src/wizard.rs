//! Checkout wizard step definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four linear stages of the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
	#[default]
	SelectPhotos,
	ChooseSizes,
	ReviewOrder,
	Shipping,
}

impl WizardStep {
	/// Every step in flow order.
	pub const ALL: [WizardStep; 4] = [
		WizardStep::SelectPhotos,
		WizardStep::ChooseSizes,
		WizardStep::ReviewOrder,
		WizardStep::Shipping,
	];

	/// First step of the flow.
	pub const FIRST: WizardStep = WizardStep::SelectPhotos;

	/// Last step of the flow; advancing past it is clamped.
	pub const LAST: WizardStep = WizardStep::Shipping;

	/// Zero-based position of the step.
	pub fn index(self) -> usize {
		match self {
			Self::SelectPhotos => 0,
			Self::ChooseSizes => 1,
			Self::ReviewOrder => 2,
			Self::Shipping => 3,
		}
	}

	/// Step at a zero-based position, if any.
	pub fn from_index(index: usize) -> Option<Self> {
		Self::ALL.get(index).copied()
	}

	/// One-based number shown in the progress indicator.
	pub fn number(self) -> usize {
		self.index() + 1
	}

	/// Human-readable label for the step.
	pub fn label(self) -> &'static str {
		match self {
			Self::SelectPhotos => "Select Photos",
			Self::ChooseSizes => "Choose Sizes",
			Self::ReviewOrder => "Review Order",
			Self::Shipping => "Shipping",
		}
	}

	/// The following step, or `None` at the end of the flow.
	pub fn next(self) -> Option<Self> {
		Self::from_index(self.index() + 1)
	}

	/// The preceding step, or `None` at the start of the flow.
	pub fn previous(self) -> Option<Self> {
		self.index().checked_sub(1).and_then(Self::from_index)
	}

	pub fn is_first(self) -> bool {
		self == Self::FIRST
	}

	pub fn is_last(self) -> bool {
		self == Self::LAST
	}
}

impl fmt::Display for WizardStep {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}
