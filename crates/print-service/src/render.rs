//! Plain-text rendering of a checkout session.

use print_core::{CheckoutSession, PricingError};
use print_types::{format_money, format_percent, OrderSummary, ShippingField, WizardStep};
use std::fmt;

/// What the customer sees after a command: the intro screen, or the
/// progress bar, the current step and the navigation controls.
pub struct View<'a> {
	session: &'a CheckoutSession,
	summary: OrderSummary,
}

impl<'a> View<'a> {
	pub fn new(session: &'a CheckoutSession) -> Result<Self, PricingError> {
		Ok(Self {
			session,
			summary: session.summary()?,
		})
	}

	fn money(&self, amount: rust_decimal::Decimal) -> String {
		format_money(amount, self.session.currency())
	}

	fn intro(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "{}", self.session.shop_name())?;
		writeln!(f, "Transform Your Digital Memories Into Beautiful Prints")?;
		writeln!(f, "Choose Photos | Select Sizes | Quick Checkout")?;
		write!(f, "Type `start` to begin.")
	}

	fn progress(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let wizard = self.session.wizard();
		let steps: Vec<String> = WizardStep::ALL
			.iter()
			.map(|step| {
				let mark = if wizard.is_reached(*step) { 'x' } else { ' ' };
				format!("[{}] {} {}", mark, step.number(), step.label())
			})
			.collect();
		writeln!(f, "{}", steps.join("  "))
	}

	fn select_photos(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.session.photos().is_empty() {
			return writeln!(f, "No photos yet. Use `add` to add one.");
		}
		for photo in self.session.photos() {
			writeln!(f, "#{} {} ({})", photo.id, photo.display_name, photo.preview_ref)?;
		}
		Ok(())
	}

	fn choose_sizes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for photo in self.session.photos() {
			writeln!(f, "#{} {}", photo.id, photo.display_name)?;
			for size in self.session.catalog().iter() {
				match photo.selection(&size.id) {
					Some(selection) => writeln!(
						f,
						"  [x] {} {} - {}  qty {}",
						size.id,
						size.label,
						self.money(size.unit_price),
						selection.quantity
					)?,
					None => writeln!(
						f,
						"  [ ] {} {} - {}",
						size.id,
						size.label,
						self.money(size.unit_price)
					)?,
				}
			}
		}
		Ok(())
	}

	fn review_order(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let summary = &self.summary;
		writeln!(f, "Subtotal: {}", self.money(summary.subtotal))?;
		writeln!(
			f,
			"Tax ({}): {}",
			format_percent(summary.tax_rate),
			self.money(summary.tax)
		)?;
		writeln!(f, "Total (Tax included): {}", self.money(summary.total))?;
		writeln!(f, "Prints: {}", summary.print_count)?;
		writeln!(f, "Order Details:")?;
		for line in &summary.lines {
			writeln!(f, "  {}", line.display_name)?;
			for item in &line.items {
				writeln!(f, "    {} x{}", item.label, item.quantity)?;
			}
		}
		Ok(())
	}

	fn shipping(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let shipping = self.session.shipping();
		for field in ShippingField::ALL {
			let value = match (field, shipping.country) {
				(ShippingField::Country, Some(country)) => country.name(),
				(ShippingField::Country, None) => "Select Country",
				_ => shipping.get(field),
			};
			writeln!(f, "{} ({}): {}", field.label(), field.key(), value)?;
		}
		let countries: Vec<&str> = self
			.session
			.shipping_countries()
			.iter()
			.map(|country| country.code())
			.collect();
		writeln!(f, "Ships to: {}", countries.join(" "))?;
		if let Some(receipt) = self.session.receipt() {
			writeln!(
				f,
				"Order {} placed with {}: {}",
				receipt.order_id,
				receipt.backend,
				self.money(receipt.total)
			)?;
		}
		Ok(())
	}

	fn controls(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let wizard = self.session.wizard();
		if wizard.can_retreat() {
			write!(f, "[Back] ")?;
		}
		write!(f, "[{}]", wizard.action_label())
	}
}

impl fmt::Display for View<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if !self.session.is_started() {
			return self.intro(f);
		}

		self.progress(f)?;
		match self.session.current_step() {
			WizardStep::SelectPhotos => self.select_photos(f)?,
			WizardStep::ChooseSizes => self.choose_sizes(f)?,
			WizardStep::ReviewOrder => self.review_order(f)?,
			WizardStep::Shipping => self.shipping(f)?,
		}
		self.controls(f)
	}
}
