//! Key press descriptors forwarded by the host.
//!
//! Keys are written in keymap notation: optional modifiers joined by `-`,
//! followed by a character or a named key, e.g. `"ctrl-b"`, `"alt-backspace"`,
//! `"esc"`.

use std::fmt;
use std::str::FromStr;

mod modifiers;

pub use modifiers::Modifiers;

#[cfg(test)]
mod tests;

/// Key identifier without modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
	Char(char),
	Enter,
	Escape,
	Tab,
	Backspace,
	Delete,
	Left,
	Right,
	Up,
	Down,
	Home,
	End,
}

impl KeyCode {
	/// Named keys and their keymap spellings. The first spelling is canonical.
	const NAMES: &'static [(&'static str, KeyCode)] = &[
		("enter", KeyCode::Enter),
		("ret", KeyCode::Enter),
		("esc", KeyCode::Escape),
		("escape", KeyCode::Escape),
		("tab", KeyCode::Tab),
		("backspace", KeyCode::Backspace),
		("del", KeyCode::Delete),
		("delete", KeyCode::Delete),
		("left", KeyCode::Left),
		("right", KeyCode::Right),
		("up", KeyCode::Up),
		("down", KeyCode::Down),
		("home", KeyCode::Home),
		("end", KeyCode::End),
		("space", KeyCode::Char(' ')),
		("minus", KeyCode::Char('-')),
	];

	fn from_name(name: &str) -> Option<KeyCode> {
		Self::NAMES.iter().find(|(n, _)| *n == name).map(|(_, code)| *code)
	}

	fn name(self) -> Option<&'static str> {
		Self::NAMES.iter().find(|(_, code)| *code == self).map(|(n, _)| *n)
	}
}

/// A key press: a key code plus the modifiers held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
	pub code: KeyCode,
	pub modifiers: Modifiers,
}

impl Key {
	pub fn new(code: KeyCode, modifiers: Modifiers) -> Self {
		Self { code, modifiers }
	}

	/// An unmodified character key.
	pub fn char(c: char) -> Self {
		Self::new(KeyCode::Char(c), Modifiers::NONE)
	}

	/// An unmodified key.
	pub fn plain(code: KeyCode) -> Self {
		Self::new(code, Modifiers::NONE)
	}

	pub fn ctrl(c: char) -> Self {
		Self::new(KeyCode::Char(c), Modifiers::CTRL)
	}

	/// Returns the character this key inserts, if it inserts text.
	pub fn insertable_char(&self) -> Option<char> {
		match self.code {
			KeyCode::Char(c) if !self.modifiers.is_command() => Some(c),
			_ => None,
		}
	}

	/// Normalizes shifted letters so `shift-b` and `B` compare equal.
	fn normalized(self) -> Self {
		match self.code {
			KeyCode::Char(c) if self.modifiers.shift && c.is_ascii_lowercase() => Self {
				code: KeyCode::Char(c.to_ascii_uppercase()),
				modifiers: Modifiers {
					shift: false,
					..self.modifiers
				},
			},
			KeyCode::Char(c) if c.is_ascii_uppercase() => Self {
				code: self.code,
				modifiers: Modifiers {
					shift: false,
					..self.modifiers
				},
			},
			_ => self,
		}
	}

	/// Returns true if both keys denote the same chord.
	pub fn matches(&self, other: &Key) -> bool {
		self.normalized() == other.normalized()
	}
}

/// Error produced when a key string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid key `{input}`: {reason}")]
pub struct KeyParseError {
	pub input: String,
	pub reason: &'static str,
}

impl FromStr for Key {
	type Err = KeyParseError;

	fn from_str(input: &str) -> Result<Self, Self::Err> {
		let err = |reason| KeyParseError {
			input: input.to_string(),
			reason,
		};

		if input.is_empty() {
			return Err(err("empty key"));
		}
		if input == "-" {
			return Ok(Key::char('-'));
		}

		// A trailing `-` is the minus key itself, as in `ctrl--`.
		let (prefix, key) = match input.strip_suffix("--") {
			Some(prefix) => (prefix, "-"),
			None => match input.rsplit_once('-') {
				Some((prefix, key)) if !key.is_empty() => (prefix, key),
				Some(_) => return Err(err("missing key after modifier")),
				None => ("", input),
			},
		};

		let mut modifiers = Modifiers::NONE;
		for part in prefix.split('-').filter(|p| !p.is_empty()) {
			modifiers = match part {
				"ctrl" | "c" | "cmd" | "mod" => modifiers.ctrl(),
				"alt" | "a" | "opt" => modifiers.alt(),
				"shift" | "s" => modifiers.shift(),
				_ => return Err(err("unknown modifier")),
			};
		}

		let mut chars = key.chars();
		let code = match (chars.next(), chars.next()) {
			(Some(c), None) => KeyCode::Char(c),
			_ => KeyCode::from_name(&key.to_ascii_lowercase()).ok_or_else(|| err("unknown key name"))?,
		};

		Ok(Key::new(code, modifiers))
	}
}

impl fmt::Display for Key {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.modifiers.ctrl {
			f.write_str("ctrl-")?;
		}
		if self.modifiers.alt {
			f.write_str("alt-")?;
		}
		if self.modifiers.shift {
			f.write_str("shift-")?;
		}
		match self.code {
			KeyCode::Char(' ') => f.write_str("space"),
			KeyCode::Char(c) => write!(f, "{c}"),
			code => f.write_str(code.name().unwrap_or("?")),
		}
	}
}
