use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use quire_document::{DeleteOptions, ElementKind, KindOverrides, Node, Point};
use serde_json::json;

use super::*;
use crate::overlay::CandidateList;

fn editor(text: &str) -> Editor {
	let len = text.chars().count();
	Editor::builder()
		.document(Document::new(vec![Element::paragraph(text).into()]))
		.selection(Range::collapsed(Point::new([0, 0], len)))
		.build()
		.unwrap()
}

fn cursor(editor: &Editor) -> Point {
	let range = editor.selection().expect("selection");
	assert!(range.is_collapsed(), "expected a cursor, got {range}");
	range.anchor.clone()
}

#[test]
fn test_build_rejects_malformed_document() {
	let empty = Document::new(vec![Element::new(ElementKind::Paragraph, vec![]).into()]);
	let err = Editor::builder().document(empty).build().unwrap_err();
	assert!(matches!(err, BuildError::Document(EditError::SchemaViolation { .. })));
}

#[test]
fn test_build_rejects_unaddressable_selection() {
	let err = Editor::builder()
		.selection(Range::collapsed(Point::new([3, 0], 0)))
		.build()
		.unwrap_err();
	assert!(matches!(err, BuildError::Document(_)));
}

#[test]
fn test_build_rejects_bad_trigger() {
	let err = Editor::builder()
		.trigger(TriggerConfig::new("bad", "[", ElementKind::Mention))
		.build()
		.unwrap_err();
	assert!(matches!(err, BuildError::Config(ConfigError::Regex { .. })));
}

#[test]
fn test_extensions_compose_in_order() {
	let editor = EditorBuilder::bare()
		.extension(KindOverrides::new("voids").void(ElementKind::Todo).void(ElementKind::Mention))
		.extension(KindOverrides::new("todo-editable").set_void(ElementKind::Todo, false))
		.build()
		.unwrap();

	let schema = editor.schema();
	assert!(!schema.is_void_kind(ElementKind::Todo));
	assert!(schema.is_void_kind(ElementKind::Mention));
	assert!(!schema.is_inline_kind(ElementKind::Mention));
	assert_eq!(schema.extension_names().collect::<Vec<_>>(), ["voids", "todo-editable"]);
}

#[test]
fn test_one_notification_per_transaction() {
	let mut editor = editor("ab");
	let seen = Rc::new(RefCell::new(Vec::new()));
	let sink = seen.clone();
	editor.subscribe(move |event| sink.borrow_mut().push(event.operations.len()));

	editor
		.transact(|tx| {
			tx.insert_text("c", None)?;
			tx.insert_text("d", None)
		})
		.unwrap();

	assert_eq!(editor.document().node(&Path::new([0])).unwrap().string(), "abcd");
	// Two text insertions, two selection moves.
	assert_eq!(*seen.borrow(), [4]);
}

#[test]
fn test_failed_transaction_is_silent_and_undone() {
	let mut editor = editor("ab");
	let before = editor.document().clone();
	let calls = Rc::new(RefCell::new(0));
	let sink = calls.clone();
	editor.subscribe(move |_| *sink.borrow_mut() += 1);

	let result = editor.transact(|tx| {
		tx.insert_text("c", None)?;
		tx.delete(Some(Path::new([9]).into()), DeleteOptions::default())
	});

	assert!(result.is_err());
	assert_eq!(editor.document(), &before);
	assert_eq!(cursor(&editor), Point::new([0, 0], 2));
	assert_eq!(*calls.borrow(), 0);
}

#[test]
fn test_unsubscribe() {
	let mut editor = editor("");
	let calls = Rc::new(RefCell::new(0));
	let sink = calls.clone();
	let id = editor.subscribe(move |_| *sink.borrow_mut() += 1);

	editor.insert_text("a").unwrap();
	assert!(editor.unsubscribe(id));
	assert!(!editor.unsubscribe(id));
	editor.insert_text("b").unwrap();
	assert_eq!(*calls.borrow(), 1);
}

#[test]
fn test_commit_mention_places_cursor_after_it() {
	let mut editor = editor("hello @jo");
	assert!(editor.trigger_state().is_pending());

	let events = Rc::new(RefCell::new(0));
	let sink = events.clone();
	editor.subscribe(move |_| *sink.borrow_mut() += 1);

	assert!(editor.commit(json!({ "title": "Jo" })).unwrap());

	let block = editor.document().node(&Path::new([0])).unwrap();
	assert_eq!(block.children().len(), 3);
	assert_eq!(block.children()[0], Node::text("hello "));
	assert_eq!(block.children()[1], Node::from(Element::mention(json!({ "title": "Jo" }))));
	assert_eq!(cursor(&editor), Point::new([0, 2], 0));
	assert!(editor.document().void_ancestor(&cursor(&editor).path, editor.schema()).is_none());
	assert_eq!(editor.trigger_state(), &TriggerState::Idle);
	assert_eq!(*events.borrow(), 1);
}

#[test]
fn test_commit_block_void_at_end_appends_paragraph() {
	let mut editor = editor("hello @query");
	assert_eq!(editor.trigger_state().pending().map(|m| m.trigger.as_str()), Some("query"));

	assert!(editor.commit(Value::Null).unwrap());

	let doc = editor.document();
	assert_eq!(doc.children().len(), 3);
	assert_eq!(doc.children()[0], Node::from(Element::paragraph("hello ")));
	assert_eq!(doc.children()[1], Node::from(Element::query_void()));
	assert_eq!(doc.children()[2], Node::from(Element::paragraph("")));
	assert_eq!(cursor(&editor), Point::new([2, 0], 0));
}

#[test]
fn test_commit_block_void_before_content_reuses_next_block() {
	let mut editor = Editor::builder()
		.document(Document::new(vec![
			Element::paragraph("@query").into(),
			Element::paragraph("next").into(),
		]))
		.selection(Range::collapsed(Point::new([0, 0], 6)))
		.build()
		.unwrap();

	assert!(editor.commit(Value::Null).unwrap());

	let doc = editor.document();
	assert_eq!(doc.children().len(), 3);
	assert_eq!(doc.children()[1], Node::from(Element::query_void()));
	assert_eq!(cursor(&editor), Point::new([2, 0], 0));
}

#[test]
fn test_commit_while_idle() {
	let mut editor = editor("plain");
	assert!(!editor.commit(json!(1)).unwrap());
	assert!(!editor.commit_selected().unwrap());
	assert!(!editor.dismiss());
}

#[test]
fn test_commit_selected_without_overlay_uses_search() {
	let mut editor = editor("hi @ann");
	assert!(editor.commit_selected().unwrap());
	let mention = editor.document().node(&Path::new([0, 1])).unwrap();
	assert_eq!(mention.as_element().and_then(|e| e.attr("task")), Some(&json!("ann")));
}

#[test]
fn test_overlay_receives_transitions_and_chooses() {
	let mut editor = Editor::builder()
		.selection(Range::collapsed(Point::new([0, 0], 0)))
		.overlay(CandidateList::new(["Buy milk", "Read a book"]))
		.build()
		.unwrap();

	editor.insert_text("x @rea").unwrap();
	assert_eq!(editor.overlay_data().map(|d| d.filter), Some("rea".to_string()));
	assert!(editor.commit_selected().unwrap());

	let mention = editor.document().node(&Path::new([0, 1])).unwrap();
	assert_eq!(
		mention.as_element().and_then(|e| e.attr("task")),
		Some(&json!({ "title": "Read a book" }))
	);
	assert!(editor.overlay_data().is_none());
}

#[test]
fn test_pending_marks_cleared_by_selection_change() {
	let mut editor = editor("ab");
	editor.toggle_bold().unwrap();
	assert!(editor.pending_marks().is_some());
	assert!(editor.is_mark_active("bold"));

	editor.move_cursor(MoveOptions::default().reverse()).unwrap();
	assert!(editor.pending_marks().is_none());
	assert!(!editor.is_mark_active("bold"));
}
