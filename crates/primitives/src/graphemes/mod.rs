use unicode_segmentation::UnicodeSegmentation;

use crate::range::CharIdx;

#[cfg(test)]
mod tests;

/// Returns the char offsets of every grapheme cluster boundary in `text`,
/// including `0` and the char length.
fn boundaries(text: &str) -> Vec<CharIdx> {
	let mut out = Vec::with_capacity(text.len() + 1);
	let mut chars = 0;
	out.push(0);
	for grapheme in text.graphemes(true) {
		chars += grapheme.chars().count();
		out.push(chars);
	}
	out
}

/// Returns whether `char_idx` is at a grapheme cluster boundary.
///
/// Boundaries occur at the start/end of text and between grapheme clusters.
pub fn is_grapheme_boundary(text: &str, char_idx: CharIdx) -> bool {
	boundaries(text).binary_search(&char_idx).is_ok()
}

/// Returns the char index of the next grapheme cluster boundary after `char_idx`.
///
/// If `char_idx` is at or past the end, returns the char length of `text`.
pub fn next_grapheme_boundary(text: &str, char_idx: CharIdx) -> CharIdx {
	let bounds = boundaries(text);
	let len = bounds.last().copied().unwrap_or(0);
	bounds.into_iter().find(|&b| b > char_idx).unwrap_or(len)
}

/// Returns the char index of the previous grapheme cluster boundary before `char_idx`.
///
/// If `char_idx` is 0, returns 0.
pub fn prev_grapheme_boundary(text: &str, char_idx: CharIdx) -> CharIdx {
	boundaries(text).into_iter().rev().find(|&b| b < char_idx).unwrap_or(0)
}
