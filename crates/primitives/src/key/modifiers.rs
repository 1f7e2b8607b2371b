/// Modifier keys held during a key press.
///
/// `ctrl` also stands for Cmd on hosts that report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
	pub ctrl: bool,
	pub alt: bool,
	pub shift: bool,
}

impl Modifiers {
	pub const NONE: Self = Self::held(false, false, false);
	pub const CTRL: Self = Self::held(true, false, false);
	pub const ALT: Self = Self::held(false, true, false);
	pub const SHIFT: Self = Self::held(false, false, true);

	const fn held(ctrl: bool, alt: bool, shift: bool) -> Self {
		Self { ctrl, alt, shift }
	}

	pub fn ctrl(self) -> Self {
		Self { ctrl: true, ..self }
	}

	pub fn alt(self) -> Self {
		Self { alt: true, ..self }
	}

	pub fn shift(self) -> Self {
		Self { shift: true, ..self }
	}

	pub fn is_empty(self) -> bool {
		self == Self::NONE
	}

	/// Ctrl or Alt turn a character key into a command. Shift alone only
	/// changes the character typed.
	pub fn is_command(self) -> bool {
		self.ctrl || self.alt
	}
}
