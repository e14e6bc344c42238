//! Wizard step controller.
//!
//! Moves the checkout through its four steps one at a time. Navigation past
//! either end is clamped and reported as "no change" rather than an error.

use print_types::WizardStep;

/// Label of the primary action on every step but the last.
pub const CONTINUE_LABEL: &str = "Continue";

/// Label of the primary action on the last step.
pub const PLACE_ORDER_LABEL: &str = "Place Order";

/// Tracks the current wizard step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WizardController {
	current: WizardStep,
}

impl WizardController {
	/// Creates a controller positioned at the first step.
	pub fn new() -> Self {
		Self::default()
	}

	pub fn current(&self) -> WizardStep {
		self.current
	}

	/// Moves to the next step, staying put at the last one.
	///
	/// Returns whether the step changed.
	pub fn advance(&mut self) -> bool {
		self.move_to(self.current.next())
	}

	/// Moves to the previous step, staying put at the first one.
	///
	/// Returns whether the step changed.
	pub fn retreat(&mut self) -> bool {
		self.move_to(self.current.previous())
	}

	fn move_to(&mut self, step: Option<WizardStep>) -> bool {
		match step {
			Some(step) => {
				tracing::debug!(from = %self.current, to = %step, "Step changed");
				self.current = step;
				true
			},
			None => false,
		}
	}

	/// Whether the Back control is shown.
	pub fn can_retreat(&self) -> bool {
		!self.current.is_first()
	}

	/// Whether `step` is the current step or one already passed.
	pub fn is_reached(&self, step: WizardStep) -> bool {
		step <= self.current
	}

	/// Label of the primary action for the current step.
	pub fn action_label(&self) -> &'static str {
		if self.current.is_last() {
			PLACE_ORDER_LABEL
		} else {
			CONTINUE_LABEL
		}
	}
}
