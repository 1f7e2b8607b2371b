use super::*;

#[test]
fn parse_plain_char() {
	assert_eq!("b".parse::<Key>().unwrap(), Key::char('b'));
	assert_eq!("-".parse::<Key>().unwrap(), Key::char('-'));
}

#[test]
fn parse_modifiers() {
	let key: Key = "ctrl-b".parse().unwrap();
	assert_eq!(key, Key::ctrl('b'));

	let key: Key = "ctrl-alt-x".parse().unwrap();
	assert_eq!(key.modifiers, Modifiers::CTRL.alt());
	assert_eq!(key.code, KeyCode::Char('x'));

	let key: Key = "ctrl--".parse().unwrap();
	assert_eq!(key, Key::ctrl('-'));
}

#[test]
fn parse_named_keys() {
	assert_eq!("enter".parse::<Key>().unwrap(), Key::plain(KeyCode::Enter));
	assert_eq!("Esc".parse::<Key>().unwrap(), Key::plain(KeyCode::Escape));
	assert_eq!(
		"alt-backspace".parse::<Key>().unwrap(),
		Key::new(KeyCode::Backspace, Modifiers::ALT)
	);
	assert_eq!("space".parse::<Key>().unwrap(), Key::char(' '));
}

#[test]
fn parse_errors() {
	assert!("".parse::<Key>().is_err());
	assert!("hyper-x".parse::<Key>().is_err());
	assert!("ctrl-".parse::<Key>().is_err());
	assert!("ctrl-nope".parse::<Key>().is_err());
}

#[test]
fn shifted_letters_match_uppercase() {
	let shifted = Key::new(KeyCode::Char('b'), Modifiers::CTRL.shift());
	let upper = Key::new(KeyCode::Char('B'), Modifiers::CTRL);
	assert!(shifted.matches(&upper));
	assert!(!Key::ctrl('b').matches(&upper));
}

#[test]
fn insertable_chars() {
	assert_eq!(Key::char('x').insertable_char(), Some('x'));
	assert_eq!(Key::new(KeyCode::Char('X'), Modifiers::SHIFT).insertable_char(), Some('X'));
	assert_eq!(Key::ctrl('x').insertable_char(), None);
	assert_eq!(Key::plain(KeyCode::Enter).insertable_char(), None);
}

#[test]
fn display_round_trips() {
	for input in ["ctrl-b", "alt-backspace", "enter", "space", "ctrl-alt-t"] {
		let key: Key = input.parse().unwrap();
		assert_eq!(key.to_string(), input);
	}
}
