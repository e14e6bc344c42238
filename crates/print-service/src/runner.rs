//! Drives a checkout from a command script.
//!
//! Each line is parsed and applied to the session. Mistakes in a line are
//! reported and the script carries on; only I/O failures stop it.

use crate::commands::{Command, CommandError};
use crate::render::View;
use print_core::{Checkout, CheckoutError, PricingError, SelectionError, ToggleOutcome};
use print_types::ShippingParseError;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Errors reported for a single script line.
#[derive(Debug, Error)]
pub enum RunError {
	#[error(transparent)]
	Command(#[from] CommandError),
	#[error(transparent)]
	Checkout(#[from] CheckoutError),
	#[error(transparent)]
	Selection(#[from] SelectionError),
	#[error(transparent)]
	Shipping(#[from] ShippingParseError),
	#[error(transparent)]
	Pricing(#[from] PricingError),
	#[error("Checkout has not started; run `start` first")]
	NotStarted,
}

/// Applies commands to a checkout and renders the result.
pub struct ScriptRunner {
	checkout: Checkout,
}

impl ScriptRunner {
	pub fn new(checkout: Checkout) -> Self {
		Self { checkout }
	}

	pub fn checkout(&self) -> &Checkout {
		&self.checkout
	}

	/// Applies one line and returns a short note about what happened.
	///
	/// Returns `Ok(None)` for blank and comment lines.
	pub async fn execute(&mut self, line: &str) -> Result<Option<String>, RunError> {
		let Some(command) = Command::parse_line(line)? else {
			return Ok(None);
		};

		let session = &mut self.checkout.session;
		if !session.is_started() && !matches!(command, Command::Start | Command::Show) {
			return Err(RunError::NotStarted);
		}

		let note = match command {
			Command::Start => {
				if session.start() {
					"Started".to_string()
				} else {
					"Already started".to_string()
				}
			},
			Command::Add(asset) => {
				let id = match asset {
					Some(asset) => session.add_photo_with(asset),
					None => session.add_photo(),
				};
				format!("Added photo #{}", id)
			},
			Command::Toggle { photo, size } => match session.toggle_size(photo, &size)? {
				ToggleOutcome::Selected => format!("Selected {} for photo #{}", size, photo),
				ToggleOutcome::Deselected => format!("Removed {} from photo #{}", size, photo),
				ToggleOutcome::PhotoNotFound => format!("No photo #{}", photo),
			},
			Command::Quantity { photo, size, delta } => {
				match session.adjust_quantity(photo, &size, delta) {
					Some(quantity) => format!("Photo #{} {}: {} prints", photo, size, quantity),
					None => format!("Photo #{} has no {} selection", photo, size),
				}
			},
			Command::Next => {
				if session.advance() {
					format!("Step {}", session.current_step().number())
				} else {
					"Already at the last step; use `place` to order".to_string()
				}
			},
			Command::Back => {
				if session.retreat() {
					format!("Step {}", session.current_step().number())
				} else {
					"Already at the first step".to_string()
				}
			},
			Command::Ship { field, value } => {
				session.set_shipping(field, &value)?;
				format!("Set {}", field.label())
			},
			Command::Show => String::new(),
			Command::Place => {
				let receipt = self.checkout.place_order().await?;
				format!("Order {} placed", receipt.order_id)
			},
		};
		Ok(Some(note))
	}

	/// Current view as text.
	pub fn render(&self) -> Result<String, RunError> {
		Ok(View::new(&self.checkout.session)?.to_string())
	}

	/// Runs every line of `input`, writing notes and views to `output`.
	///
	/// Returns the number of lines that failed.
	pub async fn run<R, W>(&mut self, input: R, output: &mut W) -> std::io::Result<usize>
	where
		R: AsyncBufRead + Unpin,
		W: AsyncWrite + Unpin,
	{
		let mut lines = input.lines();
		let mut failures = 0;
		let mut line_number = 0;

		output.write_all(format!("{}\n\n", self.render_or_error()).as_bytes()).await?;
		while let Some(line) = lines.next_line().await? {
			line_number += 1;
			match self.execute(&line).await {
				Ok(None) => continue,
				Ok(Some(note)) => {
					if !note.is_empty() {
						output.write_all(format!("> {}\n", note).as_bytes()).await?;
					}
				},
				Err(e) => {
					failures += 1;
					tracing::warn!(line = line_number, command = %line.trim(), error = %e, "Command rejected");
					output.write_all(format!("! {}\n", e).as_bytes()).await?;
				},
			}
			output.write_all(format!("{}\n\n", self.render_or_error()).as_bytes()).await?;
		}
		output.flush().await?;

		Ok(failures)
	}

	fn render_or_error(&self) -> String {
		self.render().unwrap_or_else(|e| format!("! {}", e))
	}
}
