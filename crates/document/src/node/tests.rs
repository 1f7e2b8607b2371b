use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

#[test]
fn test_text_marks_flatten_into_json() {
	let text = Text::new("hi").with_mark("bold");
	assert_eq!(serde_json::to_value(&text).unwrap(), json!({ "text": "hi", "bold": true }));
}

#[test]
fn test_element_json_shape() {
	let node = Node::from(Element::mention(json!({ "id": 3, "title": "ship" })));
	let value = serde_json::to_value(&node).unwrap();
	assert_eq!(
		value,
		json!({
			"type": "mention",
			"children": [{ "text": "" }],
			"task": { "id": 3, "title": "ship" },
		})
	);
	let back: Node = serde_json::from_value(value).unwrap();
	assert_eq!(back, node);
}

#[test]
fn test_untagged_node_prefers_text() {
	let node: Node = serde_json::from_value(json!({ "text": "a", "italic": true })).unwrap();
	assert!(node.as_text().is_some_and(|t| t.has_mark("italic")));

	let node: Node = serde_json::from_value(json!({ "type": "query-void", "children": [{ "text": "" }] })).unwrap();
	assert_eq!(node.kind(), Some(ElementKind::QueryVoid));
}

#[test]
fn test_kind_names_round_trip() {
	for kind in ElementKind::ALL {
		assert_eq!(kind.name().parse::<ElementKind>(), Ok(kind));
	}
	assert!("heading".parse::<ElementKind>().is_err());
}

#[test]
fn test_unknown_kind_error() {
	let err = "heading".parse::<ElementKind>().unwrap_err();
	assert_eq!(err, UnknownKind("heading".into()));
	assert_eq!(err.to_string(), "unknown element kind `heading`");
	let boxed: Box<dyn std::error::Error> = Box::new(err);
	assert!(boxed.source().is_none());
}

#[test]
fn test_string_concatenates_runs() {
	let node = Node::from(Element::new(
		ElementKind::Paragraph,
		vec![Node::text("ab"), Text::new("cd").with_mark("bold").into()],
	));
	assert_eq!(node.string(), "abcd");
}

#[test]
fn test_apply_props_null_removes_mark() {
	let mut node = Node::from(Text::new("x").with_mark("bold"));
	node.apply_props(&Props::unset("bold"));
	assert_eq!(node, Node::text("x"));
}

#[test]
fn test_snapshot_restores_previous_values() {
	let mut node = Node::from(Element::todo("t", false));
	let props = Props::kind(ElementKind::Paragraph).with("checked", json!(true)).with("color", json!("red"));
	let saved = node.snapshot(&props);
	assert_eq!(saved.kind, Some(ElementKind::Todo));
	assert_eq!(saved.attrs.get("color"), Some(&serde_json::Value::Null));

	let original = node.clone();
	node.apply_props(&props);
	assert!(node.differs(&saved));
	node.apply_props(&saved);
	assert_eq!(node, original);
}

#[test]
fn test_differs_ignores_noop_patch() {
	let node = Node::from(Text::new("x").with_mark("bold"));
	assert!(!node.differs(&Props::mark("bold")));
	assert!(!node.differs(&Props::unset("italic")));
	assert!(node.differs(&Props::unset("bold")));
}
