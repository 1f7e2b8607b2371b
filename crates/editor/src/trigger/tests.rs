use pretty_assertions::assert_eq;
use quire_document::{Element, Node, Path, Point};
use serde_json::json;

use super::*;
use crate::config::EditorConfig;

fn detector() -> TriggerDetector {
	let triggers = EditorConfig::default()
		.triggers
		.iter()
		.map(|t| t.compile())
		.collect::<Result<Vec<_>>>()
		.unwrap();
	TriggerDetector::new(triggers)
}

fn doc(text: &str) -> Document {
	Document::new(vec![Element::paragraph(text).into()])
}

fn cursor(offset: usize) -> Range {
	Range::collapsed(Point::new([0, 0], offset))
}

fn span(start: usize, end: usize) -> Range {
	Range::new(Point::new([0, 0], start), Point::new([0, 0], end))
}

#[test]
fn test_mention_after_word() {
	let schema = Schema::with_defaults();
	let found = detector().detect(&doc("hello @jo"), Some(&cursor(9)), &schema);
	assert_eq!(
		found,
		Some(TriggerMatch {
			trigger: "mention".into(),
			range: span(6, 9),
			search: "jo".into(),
		})
	);
}

#[test]
fn test_space_after_mention_text_is_idle() {
	let schema = Schema::with_defaults();
	let mut detector = detector();
	let doc = doc("hello @jo ");
	assert_eq!(detector.detect(&doc, Some(&cursor(10)), &schema), None);
	assert_eq!(detector.evaluate(&doc, Some(&cursor(10)), &schema), None);
	assert_eq!(detector.state(), &TriggerState::Idle);
}

#[test]
fn test_query_wins_over_mention() {
	let schema = Schema::with_defaults();
	let found = detector().detect(&doc("@query"), Some(&cursor(6)), &schema);
	let found = found.unwrap();
	assert_eq!(found.trigger, "query");
	assert_eq!(found.search, "");
}

#[test]
fn test_text_after_cursor_blocks_match() {
	let schema = Schema::with_defaults();
	assert_eq!(detector().detect(&doc("hi @jox"), Some(&cursor(6)), &schema), None);
	assert_eq!(detector().detect(&doc("hi @jo!"), Some(&cursor(6)), &schema), None);
}

#[test]
fn test_whitespace_after_cursor_allowed() {
	let schema = Schema::with_defaults();
	let found = detector().detect(&doc("hi @jo x"), Some(&cursor(6)), &schema);
	assert_eq!(found.map(|m| m.search), Some("jo".to_string()));
}

#[test]
fn test_expanded_or_missing_selection_is_idle() {
	let schema = Schema::with_defaults();
	let doc = doc("hello @jo");
	assert_eq!(detector().detect(&doc, Some(&span(6, 9)), &schema), None);
	assert_eq!(detector().detect(&doc, None, &schema), None);
}

#[test]
fn test_start_of_document_is_idle() {
	let schema = Schema::with_defaults();
	assert_eq!(detector().detect(&doc("@jo"), Some(&cursor(0)), &schema), None);
	// The word starts the document, so nothing precedes it.
	assert_eq!(detector().detect(&doc("jo"), Some(&cursor(2)), &schema), None);
}

#[test]
fn test_transitions() {
	let schema = Schema::with_defaults();
	let mut detector = detector();

	let opened = detector.evaluate(&doc("x @j"), Some(&cursor(4)), &schema);
	assert!(matches!(opened, Some(TriggerTransition::Opened(ref m)) if m.search == "j"));

	let updated = detector.evaluate(&doc("x @jo"), Some(&cursor(5)), &schema);
	assert!(matches!(updated, Some(TriggerTransition::Updated(ref m)) if m.search == "jo"));

	let same = detector.evaluate(&doc("x @jo"), Some(&cursor(5)), &schema);
	assert_eq!(same, None);

	let closed = detector.evaluate(&doc("x @jo "), Some(&cursor(6)), &schema);
	assert_eq!(closed, Some(TriggerTransition::Closed));
	assert!(!detector.state().is_pending());
}

#[test]
fn test_dismiss_holds_until_range_changes() {
	let schema = Schema::with_defaults();
	let mut detector = detector();
	detector.evaluate(&doc("x @jo"), Some(&cursor(5)), &schema);

	assert_eq!(detector.dismiss(), Some(TriggerTransition::Closed));
	assert_eq!(detector.dismiss(), None);
	assert_eq!(detector.evaluate(&doc("x @jo"), Some(&cursor(5)), &schema), None);

	let reopened = detector.evaluate(&doc("x @joe"), Some(&cursor(6)), &schema);
	assert!(matches!(reopened, Some(TriggerTransition::Opened(ref m)) if m.search == "joe"));
}

#[test]
fn test_match_before_inline_void_neighbour() {
	let schema = Schema::with_defaults();
	let doc = Document::new(vec![
		Element::new(
			ElementKind::Paragraph,
			vec![
				Node::text(""),
				Element::mention(json!({ "id": 1 })).into(),
				Node::text(" @ann"),
			],
		)
		.into(),
	]);
	let found = detector().detect(&doc, Some(&Range::collapsed(Point::new([0, 2], 5))), &schema);
	let found = found.unwrap();
	assert_eq!(found.search, "ann");
	assert_eq!(found.range.anchor, Point::new(Path::new([0, 2]), 1));
}

#[test]
fn test_element_for() {
	let mention = Trigger::new("m", r"^@(\w+)$", ElementKind::Mention).unwrap();
	let element = mention.element_for(json!({ "title": "Buy milk" }));
	assert_eq!(element.kind, ElementKind::Mention);
	assert_eq!(element.attr("task"), Some(&json!({ "title": "Buy milk" })));

	let query = Trigger::new("q", r"^@query$", ElementKind::QueryVoid).unwrap();
	assert_eq!(query.element_for(Value::Null), Element::query_void());
	assert_eq!(query.element_for(json!("x")).attr("value"), Some(&json!("x")));
}

#[test]
fn test_invalid_pattern() {
	let err = Trigger::new("broken", "(", ElementKind::Mention).unwrap_err();
	assert!(matches!(err, ConfigError::Regex { ref name, .. } if name == "broken"));
}
