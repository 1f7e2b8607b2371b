//! Editor configuration read from TOML.
//!
//! ```toml
//! [keys]
//! "ctrl-b" = "toggle-bold"
//! "ctrl-t" = "toggle-todo"
//!
//! [[triggers]]
//! name = "mention"
//! pattern = '^@(\w+)$'
//! element = "mention"
//! ```
//!
//! Entries under `[keys]` are layered over the default bindings. A
//! `[[triggers]]` list replaces the default triggers, keeping its order.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use quire_document::ElementKind;
use quire_primitives::{Key, KeyParseError};
use serde::Deserialize;
use thiserror::Error;

use crate::commands::Command;
use crate::trigger::Trigger;


/// Errors that can occur when reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A trigger pattern is not a valid regular expression.
	#[error("invalid pattern for trigger `{name}`: {error}")]
	Regex { name: String, error: regex::Error },

	/// A key binding names a command that does not exist.
	#[error("unknown command: {0}")]
	UnknownCommand(String),

	/// A key binding could not be parsed.
	#[error(transparent)]
	InvalidKey(#[from] KeyParseError),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// A trigger as written in configuration. Compiled by [`TriggerConfig::compile`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TriggerConfig {
	pub name: String,
	pub pattern: String,
	/// Kind of the void element a commit inserts.
	pub element: ElementKind,
}

impl TriggerConfig {
	pub fn new(name: impl Into<String>, pattern: impl Into<String>, element: ElementKind) -> Self {
		Self {
			name: name.into(),
			pattern: pattern.into(),
			element,
		}
	}

	pub fn compile(&self) -> Result<Trigger> {
		Trigger::new(&self.name, &self.pattern, self.element)
	}
}

/// A key chord bound to an editor command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
	pub key: Key,
	pub command: Command,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
	#[serde(default)]
	keys: BTreeMap<String, String>,
	triggers: Option<Vec<TriggerConfig>>,
}

/// Key bindings and trigger patterns of an editor.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
	pub bindings: Vec<Binding>,
	pub triggers: Vec<TriggerConfig>,
}

impl Default for EditorConfig {
	fn default() -> Self {
		Self {
			bindings: vec![
				Binding {
					key: Key::ctrl('b'),
					command: Command::ToggleBold,
				},
				Binding {
					key: Key::ctrl('t'),
					command: Command::ToggleTodo,
				},
			],
			// `@query` would also match the mention pattern, so it goes first.
			triggers: vec![
				TriggerConfig::new("query", r"^@query$", ElementKind::QueryVoid),
				TriggerConfig::new("mention", r"^@(\w+)$", ElementKind::Mention),
			],
		}
	}
}

impl EditorConfig {
	/// Parses a configuration, validating keys, commands and patterns.
	pub fn from_toml_str(input: &str) -> Result<Self> {
		let raw: RawConfig = toml::from_str(input)?;
		let mut config = Self::default();

		for (key, command) in &raw.keys {
			let key: Key = key.parse()?;
			let command: Command = command
				.parse()
				.map_err(|_| ConfigError::UnknownCommand(command.clone()))?;
			config.bind(key, command);
		}

		if let Some(triggers) = raw.triggers {
			for trigger in &triggers {
				trigger.compile()?;
			}
			config.triggers = triggers;
		}
		Ok(config)
	}

	/// Reads and parses the configuration file at `path`.
	pub fn load(path: &Path) -> Result<Self> {
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config = Self::from_toml_str(&input)?;
		tracing::debug!(path = %path.display(), bindings = config.bindings.len(), "loaded editor config");
		Ok(config)
	}

	/// Binds `key` to `command`, replacing an existing binding of the same chord.
	pub fn bind(&mut self, key: Key, command: Command) {
		match self.bindings.iter_mut().find(|b| b.key.matches(&key)) {
			Some(binding) => binding.command = command,
			None => self.bindings.push(Binding { key, command }),
		}
	}

	/// The command bound to `key`, if any.
	pub fn command_for(&self, key: &Key) -> Option<Command> {
		self.bindings.iter().find(|b| b.key.matches(key)).map(|b| b.command)
	}
}
