//! Cursor movement primitives: units, character classes and word boundaries.

use crate::graphemes::{next_grapheme_boundary, prev_grapheme_boundary};
use crate::range::CharIdx;


/// Stand-in character for an inline void element in flattened block text.
pub const OBJECT_CHAR: char = '\u{FFFC}';

/// Distance unit for cursor movement and deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
	/// One grapheme cluster.
	#[default]
	Character,
	/// One word, see [`prev_word_boundary`].
	Word,
}

/// Classification used to group characters into words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
	Whitespace,
	/// Alphanumeric or underscore.
	Word,
	/// Anything else, apostrophes included.
	Punctuation,
	/// An inline void element; always a run of length one.
	Object,
}

/// Returns whether a character is a word character (alphanumeric or underscore).
#[inline]
pub fn is_word_char(c: char) -> bool {
	c.is_alphanumeric() || c == '_'
}

pub fn char_class(c: char) -> CharClass {
	if c == OBJECT_CHAR {
		CharClass::Object
	} else if c.is_whitespace() {
		CharClass::Whitespace
	} else if is_word_char(c) {
		CharClass::Word
	} else {
		CharClass::Punctuation
	}
}

/// Finds the word boundary before `pos`.
///
/// Skips whitespace, then the run of characters sharing the class of the
/// character before the cursor. In `"hello @jo"` the boundary before the end
/// is the start of `jo`.
pub fn prev_word_boundary(text: &str, pos: CharIdx) -> CharIdx {
	let chars: Vec<char> = text.chars().collect();
	let mut i = pos.min(chars.len());

	while i > 0 && char_class(chars[i - 1]) == CharClass::Whitespace {
		i -= 1;
	}
	if i == 0 {
		return 0;
	}

	let class = char_class(chars[i - 1]);
	if class == CharClass::Object {
		return i - 1;
	}
	while i > 0 && char_class(chars[i - 1]) == class {
		i -= 1;
	}
	i
}

/// Finds the word boundary after `pos`; the mirror image of [`prev_word_boundary`].
pub fn next_word_boundary(text: &str, pos: CharIdx) -> CharIdx {
	let chars: Vec<char> = text.chars().collect();
	let len = chars.len();
	let mut i = pos.min(len);

	while i < len && char_class(chars[i]) == CharClass::Whitespace {
		i += 1;
	}
	if i == len {
		return len;
	}

	let class = char_class(chars[i]);
	if class == CharClass::Object {
		return i + 1;
	}
	while i < len && char_class(chars[i]) == class {
		i += 1;
	}
	i
}

/// Moves `pos` back by one `unit`, or returns `None` at the start of `text`.
pub fn step_back(text: &str, pos: CharIdx, unit: Unit) -> Option<CharIdx> {
	if pos == 0 {
		return None;
	}
	Some(match unit {
		Unit::Character => prev_grapheme_boundary(text, pos),
		Unit::Word => prev_word_boundary(text, pos),
	})
}

/// Moves `pos` forward by one `unit`, or returns `None` at the end of `text`.
pub fn step_forward(text: &str, pos: CharIdx, unit: Unit) -> Option<CharIdx> {
	if pos >= text.chars().count() {
		return None;
	}
	Some(match unit {
		Unit::Character => next_grapheme_boundary(text, pos),
		Unit::Word => next_word_boundary(text, pos),
	})
}
