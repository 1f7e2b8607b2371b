use pretty_assertions::assert_eq;
use quire_primitives::Modifiers;

use super::*;

#[test]
fn test_plain_characters() {
	assert_eq!(parse("a @").unwrap(), [Key::char('a'), Key::char(' '), Key::char('@')]);
	assert_eq!(parse("é").unwrap(), [Key::char('é')]);
	assert!(parse("").unwrap().is_empty());
}

#[test]
fn test_named_keys() {
	assert_eq!(
		parse("x<enter><ctrl-b><alt-backspace>").unwrap(),
		[
			Key::char('x'),
			Key::plain(KeyCode::Enter),
			Key::ctrl('b'),
			Key::new(KeyCode::Backspace, Modifiers::ALT),
		]
	);
	assert_eq!(parse("<c-t>").unwrap(), [Key::ctrl('t')]);
}

#[test]
fn test_escapes() {
	assert_eq!(parse("<lt>>").unwrap(), [Key::char('<'), Key::char('>')]);
	assert_eq!(parse("a\nb").unwrap(), [Key::char('a'), Key::plain(KeyCode::Enter), Key::char('b')]);
}

#[test]
fn test_errors() {
	assert!(parse("<enter").is_err());
	assert!(parse("<hyper-x>").is_err());
	assert!(parse("<>").is_err());
}
