//! Schemas for backend settings.
//!
//! Backends receive their settings as raw TOML tables. Each backend declares a
//! [`Schema`] listing the keys it understands, so a bad setting fails when the
//! backend is built and not when the first order arrives.

use thiserror::Error;

/// Ways a settings table can fail its schema.
#[derive(Debug, Error)]
pub enum ValidationError {
	#[error("Missing required field: {0}")]
	MissingField(String),
	#[error("Invalid value for field '{field}': {message}")]
	InvalidValue { field: String, message: String },
	#[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
	TypeMismatch {
		field: String,
		expected: String,
		actual: String,
	},
}

/// Expected shape of a setting.
#[derive(Debug)]
pub enum FieldType {
	String,
	/// Integer within optional inclusive bounds.
	Integer { min: Option<i64>, max: Option<i64> },
	Boolean,
}

impl FieldType {
	fn name(&self) -> &'static str {
		match self {
			Self::String => "string",
			Self::Integer { .. } => "integer",
			Self::Boolean => "boolean",
		}
	}

	/// Checks `value` against this type, naming it `field` in errors.
	fn check(&self, field: &str, value: &toml::Value) -> Result<(), ValidationError> {
		let mismatch = || ValidationError::TypeMismatch {
			field: field.to_string(),
			expected: self.name().to_string(),
			actual: value.type_str().to_string(),
		};

		match (self, value) {
			(Self::String, toml::Value::String(_)) | (Self::Boolean, toml::Value::Boolean(_)) => {
				Ok(())
			},
			(Self::Integer { min, max }, toml::Value::Integer(n)) => {
				let out_of_range = |message: String| ValidationError::InvalidValue {
					field: field.to_string(),
					message,
				};
				if let Some(min) = min.filter(|min| n < min) {
					return Err(out_of_range(format!("Value {} is less than minimum {}", n, min)));
				}
				if let Some(max) = max.filter(|max| n > max) {
					return Err(out_of_range(format!("Value {} is greater than maximum {}", n, max)));
				}
				Ok(())
			},
			_ => Err(mismatch()),
		}
	}
}

/// Extra check run on a setting after its type matched. Returns a message
/// describing the problem on failure.
pub type FieldValidator = Box<dyn Fn(&toml::Value) -> Result<(), String> + Send + Sync>;

/// A named setting in a [`Schema`].
pub struct Field {
	pub name: String,
	pub field_type: FieldType,
	pub validator: Option<FieldValidator>,
}

impl std::fmt::Debug for Field {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Field")
			.field("name", &self.name)
			.field("field_type", &self.field_type)
			.field("has_validator", &self.validator.is_some())
			.finish()
	}
}

impl Field {
	pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			field_type,
			validator: None,
		}
	}

	pub fn with_validator<F>(mut self, validator: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<(), String> + Send + Sync + 'static,
	{
		self.validator = Some(Box::new(validator));
		self
	}

	fn check(&self, value: &toml::Value) -> Result<(), ValidationError> {
		self.field_type.check(&self.name, value)?;
		match &self.validator {
			Some(validator) => validator(value).map_err(|message| ValidationError::InvalidValue {
				field: self.name.clone(),
				message,
			}),
			None => Ok(()),
		}
	}
}

/// Settings a backend accepts. Keys not listed are ignored.
#[derive(Debug)]
pub struct Schema {
	pub required: Vec<Field>,
	pub optional: Vec<Field>,
}

impl Schema {
	pub fn new(required: Vec<Field>, optional: Vec<Field>) -> Self {
		Self { required, optional }
	}

	/// Checks a settings table: required keys present, present keys well
	/// typed and accepted by their validators.
	pub fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let Some(table) = config.as_table() else {
			return Err(ValidationError::TypeMismatch {
				field: "root".to_string(),
				expected: "table".to_string(),
				actual: config.type_str().to_string(),
			});
		};

		if let Some(missing) = self.required.iter().find(|f| !table.contains_key(&f.name)) {
			return Err(ValidationError::MissingField(missing.name.clone()));
		}

		self.required
			.iter()
			.chain(&self.optional)
			.filter_map(|field| table.get(&field.name).map(|value| (field, value)))
			.try_for_each(|(field, value)| field.check(value))
	}
}

/// Implemented by each backend to describe its settings.
pub trait ConfigSchema: Send + Sync {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	fn schema() -> Schema {
		Schema::new(
			vec![Field::new("target", FieldType::String)],
			vec![
				Field::new(
					"capacity",
					FieldType::Integer {
						min: Some(1),
						max: None,
					},
				),
				Field::new("verbose", FieldType::Boolean),
			],
		)
	}

	#[test]
	fn test_valid_config() {
		let config: toml::Value = toml::from_str(
			r#"
target = "orders"
capacity = 10
verbose = true
"#,
		)
		.unwrap();
		assert!(schema().validate(&config).is_ok());
	}

	#[test]
	fn test_missing_required_field() {
		let config: toml::Value = toml::from_str("capacity = 3").unwrap();
		let err = schema().validate(&config).unwrap_err();
		assert!(matches!(err, ValidationError::MissingField(f) if f == "target"));
	}

	#[test]
	fn test_type_and_bounds() {
		let config: toml::Value = toml::from_str("target = 5").unwrap();
		assert!(matches!(
			schema().validate(&config),
			Err(ValidationError::TypeMismatch { .. })
		));

		let config: toml::Value = toml::from_str("target = \"x\"\ncapacity = 0").unwrap();
		assert!(matches!(
			schema().validate(&config),
			Err(ValidationError::InvalidValue { .. })
		));

		let config: toml::Value = toml::from_str("target = \"x\"\nverbose = [true]").unwrap();
		let err = schema().validate(&config).unwrap_err();
		assert!(err.to_string().contains("expected boolean, got array"));
	}

	#[test]
	fn test_custom_validator() {
		let schema = Schema::new(
			vec![Field::new("target", FieldType::String).with_validator(|v| {
				match v.as_str() {
					Some(s) if !s.is_empty() => Ok(()),
					_ => Err("cannot be empty".to_string()),
				}
			})],
			vec![],
		);
		let config: toml::Value = toml::from_str("target = \"\"").unwrap();
		let err = schema.validate(&config).unwrap_err();
		assert!(err.to_string().contains("cannot be empty"));
	}
}
