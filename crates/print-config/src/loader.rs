//! Loader for configurations split across several files.
//!
//! The main file lists other files under `include`, either as one path or an
//! array of paths relative to the including file's directory. Included files
//! may include further files. Each top-level section may appear in only one
//! file, and a file may be visited only once.

use crate::{resolve_env_vars, Config, ConfigError};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

const INCLUDE_KEY: &str = "include";

/// Reads a main configuration file and everything it includes.
pub struct ConfigLoader {
	/// Directory the main file is resolved against.
	base_dir: PathBuf,
	/// Canonical paths of files read so far.
	visited: HashSet<PathBuf>,
	/// File that defined each top-level section.
	owners: HashMap<String, PathBuf>,
}

impl ConfigLoader {
	pub fn new(base_dir: impl AsRef<Path>) -> Self {
		Self {
			base_dir: base_dir.as_ref().to_path_buf(),
			visited: HashSet::new(),
			owners: HashMap::new(),
		}
	}

	/// Loads `path` and its includes into one validated [`Config`].
	pub async fn load_config(&mut self, path: impl AsRef<Path>) -> Result<Config, ConfigError> {
		let mut merged = toml::Table::new();
		let mut pending = VecDeque::from([existing_file(&self.base_dir, path.as_ref())?]);

		while let Some(file) = pending.pop_front() {
			let mut table = self.read_table(&file).await?;
			let dir = file.parent().unwrap_or(self.base_dir.as_path()).to_path_buf();
			for include in take_includes(&mut table)? {
				pending.push_back(existing_file(&dir, &include)?);
			}
			self.claim_sections(&table, &file)?;
			merged.extend(table);
		}

		tracing::debug!(files = self.visited.len(), "Combined configuration files");

		let config: Config = toml::Value::Table(merged).try_into()?;
		config.validate()?;
		Ok(config)
	}

	/// Reads one file, interpolating environment variables.
	async fn read_table(&mut self, file: &Path) -> Result<toml::Table, ConfigError> {
		let canonical = file.canonicalize()?;
		if !self.visited.insert(canonical.clone()) {
			return Err(ConfigError::Validation(format!(
				"Circular include: {} was already loaded",
				canonical.display()
			)));
		}

		let content = tokio::fs::read_to_string(file).await?;
		Ok(toml::from_str(&resolve_env_vars(&content)?)?)
	}

	/// Records `file` as the owner of its sections.
	fn claim_sections(&mut self, table: &toml::Table, file: &Path) -> Result<(), ConfigError> {
		for section in table.keys() {
			if let Some(owner) = self.owners.get(section) {
				return Err(ConfigError::Validation(format!(
					"Duplicate section '{}' in {} (already defined in {})",
					section,
					file.display(),
					owner.display()
				)));
			}
			self.owners.insert(section.clone(), file.to_path_buf());
		}
		Ok(())
	}
}

/// Removes the include directive from `table` and returns its paths.
fn take_includes(table: &mut toml::Table) -> Result<Vec<PathBuf>, ConfigError> {
	let invalid =
		|| ConfigError::Validation("'include' must be a path or an array of path strings".into());

	match table.remove(INCLUDE_KEY) {
		None => Ok(Vec::new()),
		Some(toml::Value::String(path)) => Ok(vec![PathBuf::from(path)]),
		Some(toml::Value::Array(items)) => items
			.iter()
			.map(|item| item.as_str().map(PathBuf::from).ok_or_else(invalid))
			.collect(),
		Some(_) => Err(invalid()),
	}
}

/// Joins `path` onto `dir` unless absolute, and checks that it exists.
fn existing_file(dir: &Path, path: &Path) -> Result<PathBuf, ConfigError> {
	let file = dir.join(path);
	if file.is_file() {
		Ok(file)
	} else {
		Err(ConfigError::Io(std::io::Error::new(
			std::io::ErrorKind::NotFound,
			format!("Configuration file not found: {}", file.display()),
		)))
	}
}
