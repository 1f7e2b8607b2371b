//! Key dispatch.
//!
//! A pending trigger sees keys first, then the configured bindings, then the
//! default editing behaviour.

use quire_document::{MoveOptions, Unit};
use quire_primitives::{Key, KeyCode};

use crate::commands::Command;
use crate::editor::Editor;

/// What [`Editor::handle_key`] did with a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
	/// The pending trigger was committed.
	Committed,
	/// The pending trigger was dismissed.
	Dismissed,
	/// The overlay controller consumed the key.
	Overlay,
	Command(Command),
	/// A default action ran.
	Edited,
	Ignored,
}

impl KeyOutcome {
	pub fn is_handled(self) -> bool {
		self != KeyOutcome::Ignored
	}
}

impl Editor {
	pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
		if self.trigger_state().is_pending()
			&& let Some(outcome) = self.pending_key(&key)
		{
			return outcome;
		}

		if let Some(command) = self.config.command_for(&key) {
			return match self.run(command) {
				Ok(()) => KeyOutcome::Command(command),
				Err(error) => {
					tracing::warn!(%key, %command, %error, "command failed");
					KeyOutcome::Ignored
				}
			};
		}

		match self.default_key(&key) {
			Ok(true) => KeyOutcome::Edited,
			Ok(false) => {
				tracing::trace!(%key, "unbound key");
				KeyOutcome::Ignored
			}
			Err(error) => {
				tracing::warn!(%key, %error, "key action failed");
				KeyOutcome::Ignored
			}
		}
	}

	fn pending_key(&mut self, key: &Key) -> Option<KeyOutcome> {
		if !key.modifiers.is_empty() {
			return None;
		}
		match key.code {
			KeyCode::Enter | KeyCode::Tab => Some(match self.commit_selected() {
				Ok(true) => KeyOutcome::Committed,
				Ok(false) => KeyOutcome::Ignored,
				Err(error) => {
					tracing::warn!(%key, %error, "trigger commit failed");
					KeyOutcome::Ignored
				}
			}),
			KeyCode::Escape => {
				self.dismiss();
				Some(KeyOutcome::Dismissed)
			}
			KeyCode::Up | KeyCode::Down => {
				let overlay = self.overlay.as_mut()?;
				overlay.on_key(key).then_some(KeyOutcome::Overlay)
			}
			_ => None,
		}
	}

	fn default_key(&mut self, key: &Key) -> quire_document::Result<bool> {
		if let Some(c) = key.insertable_char() {
			let mut buf = [0; 4];
			self.insert_text(c.encode_utf8(&mut buf))?;
			return Ok(true);
		}

		let unit = if key.modifiers.alt { Unit::Word } else { Unit::Character };
		match key.code {
			KeyCode::Backspace => self.delete_backward(unit)?,
			KeyCode::Delete => self.delete_forward(unit)?,
			KeyCode::Enter => self.insert_break()?,
			KeyCode::Left => self.move_cursor(MoveOptions::by(unit).reverse())?,
			KeyCode::Right => self.move_cursor(MoveOptions::by(unit))?,
			_ => return Ok(false),
		}
		Ok(true)
	}
}
