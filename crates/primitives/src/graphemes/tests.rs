use super::*;

#[test]
fn ascii_boundaries() {
	assert!(is_grapheme_boundary("hello", 0));
	assert!(is_grapheme_boundary("hello", 3));
	assert!(is_grapheme_boundary("hello", 5));
	assert_eq!(next_grapheme_boundary("hello", 1), 2);
	assert_eq!(prev_grapheme_boundary("hello", 1), 0);
	assert_eq!(next_grapheme_boundary("hello", 5), 5);
	assert_eq!(prev_grapheme_boundary("hello", 0), 0);
}

#[test]
fn combining_marks_stay_together() {
	// "e" followed by a combining acute accent is one cluster of two chars.
	let text = "ae\u{0301}b";
	assert!(!is_grapheme_boundary(text, 2));
	assert_eq!(next_grapheme_boundary(text, 1), 3);
	assert_eq!(prev_grapheme_boundary(text, 3), 1);
}

#[test]
fn emoji_sequence_is_one_step() {
	// Family emoji joined by ZWJs.
	let text = "x\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}y";
	assert_eq!(next_grapheme_boundary(text, 1), 6);
	assert_eq!(prev_grapheme_boundary(text, 6), 1);
}
