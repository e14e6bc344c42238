//! Script command parsing.
//!
//! One command per line. Blank lines and anything after `#` are ignored.

use print_types::{PhotoAsset, PhotoId, ShippingField, SizeId};
use std::str::FromStr;
use thiserror::Error;

/// Errors produced while parsing a command line.
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
	#[error("Unknown command '{0}'")]
	Unknown(String),
	#[error("Usage: {0}")]
	Usage(&'static str),
	#[error("'{0}' takes no arguments")]
	UnexpectedArguments(String),
	#[error("Invalid {what} '{value}'")]
	InvalidArgument { what: &'static str, value: String },
}

/// A single action taken by the customer.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
	/// Dismiss the intro screen.
	Start,
	/// Add a photo; a placeholder when no asset is given.
	Add(Option<PhotoAsset>),
	Toggle { photo: PhotoId, size: SizeId },
	Quantity { photo: PhotoId, size: SizeId, delta: i64 },
	Next,
	Back,
	Ship { field: ShippingField, value: String },
	Show,
	Place,
}

impl Command {
	/// Parses one script line, returning `None` for blank and comment lines.
	pub fn parse_line(line: &str) -> Result<Option<Self>, CommandError> {
		let line = match line.split_once('#') {
			Some((before, _)) => before,
			None => line,
		}
		.trim();
		if line.is_empty() {
			return Ok(None);
		}
		line.parse().map(Some)
	}
}

const ADD_USAGE: &str = "add [name [preview]]";
const TOGGLE_USAGE: &str = "toggle <photo> <size>";
const QTY_USAGE: &str = "qty <photo> <size> <delta>";
const SHIP_USAGE: &str = "ship <field> <value...>";

impl FromStr for Command {
	type Err = CommandError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut words = s.split_whitespace();
		let name = words.next().unwrap_or_default().to_ascii_lowercase();
		let args: Vec<&str> = words.collect();

		let command = match (name.as_str(), args.as_slice()) {
			("start", []) => Command::Start,
			("add", []) => Command::Add(None),
			("add", [display_name]) => Command::Add(Some(PhotoAsset::new(
				*display_name,
				print_types::PLACEHOLDER_PREVIEW,
			))),
			("add", [display_name, preview_ref]) => {
				Command::Add(Some(PhotoAsset::new(*display_name, *preview_ref)))
			},
			("add", _) => return Err(CommandError::Usage(ADD_USAGE)),
			("toggle", [photo, size]) => Command::Toggle {
				photo: parse_photo(photo)?,
				size: SizeId::from(*size),
			},
			("toggle", _) => return Err(CommandError::Usage(TOGGLE_USAGE)),
			("qty", [photo, size, delta]) => Command::Quantity {
				photo: parse_photo(photo)?,
				size: SizeId::from(*size),
				delta: delta.parse().map_err(|_| CommandError::InvalidArgument {
					what: "quantity change",
					value: delta.to_string(),
				})?,
			},
			("qty", _) => return Err(CommandError::Usage(QTY_USAGE)),
			("next", []) => Command::Next,
			("back", []) => Command::Back,
			("ship", [field, value @ ..]) => Command::Ship {
				field: field.parse().map_err(|_| CommandError::InvalidArgument {
					what: "shipping field",
					value: field.to_string(),
				})?,
				value: value.join(" "),
			},
			("ship", _) => return Err(CommandError::Usage(SHIP_USAGE)),
			("show", []) => Command::Show,
			("place", []) => Command::Place,
			("start" | "next" | "back" | "show" | "place", _) => {
				return Err(CommandError::UnexpectedArguments(name.clone()))
			},
			(other, _) => return Err(CommandError::Unknown(other.to_string())),
		};
		Ok(command)
	}
}

fn parse_photo(value: &str) -> Result<PhotoId, CommandError> {
	value
		.parse::<u32>()
		.map(PhotoId)
		.map_err(|_| CommandError::InvalidArgument {
			what: "photo id",
			value: value.to_string(),
		})
}
