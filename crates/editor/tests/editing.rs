use pretty_assertions::assert_eq;
use proptest::prelude::*;
use quire_document::{Document, Element, ElementKind, Node, Path, Point, Range, Text};
use quire_editor::{Command, Editor, EditorConfig, KeyOutcome, TriggerState};
use quire_primitives::{Key, KeyCode};
use serde_json::json;

fn editor_with(children: Vec<Node>, cursor: Point) -> Editor {
	Editor::builder()
		.document(Document::new(children))
		.selection(Range::collapsed(cursor))
		.build()
		.unwrap()
}

fn empty_editor() -> Editor {
	editor_with(vec![Element::paragraph("").into()], Point::new([0, 0], 0))
}

fn type_text(editor: &mut Editor, text: &str) {
	for c in text.chars() {
		assert_eq!(editor.handle_key(Key::char(c)), KeyOutcome::Edited, "typing {c:?}");
	}
}

fn key(editor: &mut Editor, key: &str) -> KeyOutcome {
	editor.handle_key(key.parse().unwrap())
}

fn block_string(editor: &Editor, index: usize) -> String {
	editor.document().node(&Path::new([index])).unwrap().string()
}

fn cursor(editor: &Editor) -> Point {
	let range = editor.selection().unwrap();
	assert!(range.is_collapsed());
	range.anchor.clone()
}

#[test]
fn test_typing_a_mention_opens_then_space_closes() {
	let mut editor = empty_editor();
	type_text(&mut editor, "hello @jo");

	let pending = editor.trigger_state().pending().cloned().unwrap();
	assert_eq!(pending.trigger, "mention");
	assert_eq!(pending.search, "jo");
	assert_eq!(editor.document().string(&pending.range), "@jo");

	type_text(&mut editor, " ");
	assert_eq!(editor.trigger_state(), &TriggerState::Idle);
}

#[test]
fn test_enter_commits_and_typing_continues_after_the_mention() {
	let mut editor = empty_editor();
	type_text(&mut editor, "ping @ann");

	assert_eq!(key(&mut editor, "enter"), KeyOutcome::Committed);
	type_text(&mut editor, " ok");

	let block = editor.document().node(&Path::new([0])).unwrap();
	assert_eq!(block.children()[1].kind(), Some(ElementKind::Mention));
	assert_eq!(block.children()[2], Node::text(" ok"));
	assert_eq!(block_string(&editor, 0), "ping  ok");
	assert_eq!(cursor(&editor), Point::new([0, 2], 3));
}

#[test]
fn test_tab_commits_a_query_widget() {
	let mut editor = empty_editor();
	type_text(&mut editor, "@query");

	assert_eq!(key(&mut editor, "tab"), KeyOutcome::Committed);
	let doc = editor.document();
	assert_eq!(doc.children()[1], Node::from(Element::query_void()));
	assert_eq!(cursor(&editor), Point::new([2, 0], 0));
}

#[test]
fn test_escape_dismisses_until_the_match_changes() {
	let mut editor = empty_editor();
	type_text(&mut editor, "hi @jo");
	let before = editor.document().clone();

	assert_eq!(key(&mut editor, "esc"), KeyOutcome::Dismissed);
	assert_eq!(editor.trigger_state(), &TriggerState::Idle);
	assert_eq!(editor.document(), &before);

	// With nothing pending, Enter splits the block.
	assert_eq!(key(&mut editor, "enter"), KeyOutcome::Edited);
	assert_eq!(editor.document().children().len(), 2);
	assert_eq!(key(&mut editor, "backspace"), KeyOutcome::Edited);
	assert_eq!(editor.document().children().len(), 1);

	type_text(&mut editor, "e");
	assert_eq!(editor.trigger_state().pending().map(|m| m.search.as_str()), Some("joe"));
}

#[test]
fn test_arrows_without_overlay_fall_through() {
	let mut editor = empty_editor();
	type_text(&mut editor, "@ab");
	assert_eq!(key(&mut editor, "up"), KeyOutcome::Ignored);
	assert!(editor.trigger_state().is_pending());
}

#[test]
fn test_ctrl_b_toggles_bold_over_selection() {
	let mut editor = editor_with(vec![Element::paragraph("hello world").into()], Point::new([0, 0], 0));
	editor
		.transact(|tx| tx.select(Range::new(Point::new([0, 0], 0), Point::new([0, 0], 5))))
		.unwrap();

	assert_eq!(key(&mut editor, "ctrl-b"), KeyOutcome::Command(Command::ToggleBold));
	assert!(editor.is_mark_active("bold"));
	let runs: Vec<_> = editor.document().texts().into_iter().map(|(_, t)| t.clone()).collect();
	assert_eq!(runs, [Text::new("hello").with_mark("bold"), Text::new(" world")]);

	assert_eq!(key(&mut editor, "ctrl-b"), KeyOutcome::Command(Command::ToggleBold));
	assert!(!editor.is_mark_active("bold"));
	assert!(editor.document().texts().iter().all(|(_, t)| !t.has_mark("bold")));
}

#[test]
fn test_mixed_runs_are_not_universally_bold() {
	let mut editor = editor_with(
		vec![
			Element::new(
				ElementKind::Paragraph,
				vec![Text::new("bold").with_mark("bold").into(), Node::text("plain")],
			)
			.into(),
		],
		Point::new([0, 0], 0),
	);
	let all = Range::new(Point::new([0, 0], 0), Point::new([0, 1], 5));
	editor.transact(|tx| tx.select(all)).unwrap();
	assert!(!editor.is_mark_active("bold"));

	editor.toggle_bold().unwrap();
	assert!(editor.is_mark_active("bold"));
	assert!(editor.document().texts().iter().all(|(_, t)| t.has_mark("bold")));
}

#[test]
fn test_pending_bold_applies_to_typed_text() {
	let mut editor = editor_with(vec![Element::paragraph("ab").into()], Point::new([0, 0], 2));
	assert_eq!(key(&mut editor, "ctrl-b"), KeyOutcome::Command(Command::ToggleBold));
	type_text(&mut editor, "cd");

	let runs: Vec<_> = editor.document().texts().into_iter().map(|(_, t)| t.clone()).collect();
	assert_eq!(runs, [Text::new("ab"), Text::new("cd").with_mark("bold")]);
	assert!(editor.is_mark_active("bold"));
}

#[test]
fn test_ctrl_t_toggles_todo_blocks() {
	let mut editor = editor_with(vec![Element::paragraph("task").into()], Point::new([0, 0], 1));

	assert_eq!(key(&mut editor, "ctrl-t"), KeyOutcome::Command(Command::ToggleTodo));
	let block = editor.document().node(&Path::new([0])).unwrap().as_element().cloned().unwrap();
	assert_eq!(block.kind, ElementKind::Todo);
	assert_eq!(block.attr("checked"), Some(&json!(false)));
	assert!(editor.is_block_active(ElementKind::Todo));

	editor.toggle_todo().unwrap();
	assert_eq!(editor.document().children()[0], Node::from(Element::paragraph("task")));
}

#[test]
fn test_word_deletion_and_motion() {
	let mut editor = editor_with(vec![Element::paragraph("one two three").into()], Point::new([0, 0], 13));

	assert_eq!(key(&mut editor, "alt-backspace"), KeyOutcome::Edited);
	assert_eq!(block_string(&editor, 0), "one two ");

	assert_eq!(key(&mut editor, "alt-left"), KeyOutcome::Edited);
	assert_eq!(cursor(&editor), Point::new([0, 0], 4));
	assert_eq!(key(&mut editor, "left"), KeyOutcome::Edited);
	assert_eq!(key(&mut editor, "del"), KeyOutcome::Edited);
	assert_eq!(block_string(&editor, 0), "onetwo ");
	assert_eq!(key(&mut editor, "right"), KeyOutcome::Edited);
	assert_eq!(cursor(&editor), Point::new([0, 0], 4));
}

#[test]
fn test_configured_bindings_take_effect() {
	let config = EditorConfig::from_toml_str("[keys]\n\"ctrl-i\" = \"toggle-italic\"\n").unwrap();
	let mut editor = Editor::builder()
		.config(config)
		.selection(Range::collapsed(Point::new([0, 0], 0)))
		.build()
		.unwrap();

	assert_eq!(
		editor.handle_key(Key::ctrl('i')),
		KeyOutcome::Command(Command::ToggleItalic)
	);
	assert!(editor.is_mark_active("italic"));
	assert_eq!(editor.handle_key(Key::ctrl('q')), KeyOutcome::Ignored);
	assert_eq!(editor.handle_key(Key::plain(KeyCode::Home)), KeyOutcome::Ignored);
}

fn plain_offsets(doc: &Document) -> Vec<Point> {
	doc.texts()
		.into_iter()
		.filter(|(path, _)| path.len() == 2)
		.flat_map(|(path, text)| (0..=text.len()).map(move |i| Point::new(path.clone(), i)))
		.collect()
}

fn char_marks(doc: &Document) -> Vec<(char, bool)> {
	doc.texts()
		.into_iter()
		.flat_map(|(_, text)| text.text.chars().map(move |c| (c, text.has_mark("bold"))))
		.collect()
}

proptest! {
	#[test]
	fn toggling_bold_twice_restores_marks(bold in any::<bool>(), a in 0usize..64, b in 0usize..64) {
		let run = |s: &str| if bold { Text::new(s).with_mark("bold") } else { Text::new(s) };
		let children = vec![
			Element::new(
				ElementKind::Paragraph,
				vec![run("ab").into(), Element::mention(json!({ "id": 1 })).into(), run("cd").into()],
			)
			.into(),
			Element::new(ElementKind::Paragraph, vec![run("ef gh").into()]).into(),
		];
		let mut editor = editor_with(children, Point::new([0, 0], 0));
		let points = plain_offsets(editor.document());
		let range = Range::new(points[a % points.len()].clone(), points[b % points.len()].clone());
		editor.transact(|tx| tx.select(range)).unwrap();
		let original = char_marks(editor.document());

		editor.toggle_bold().unwrap();
		editor.toggle_bold().unwrap();

		prop_assert_eq!(char_marks(editor.document()), original);
		prop_assert!(editor.document().validate(editor.schema()).is_ok());
	}
}
