use super::*;
use crate::node::Element;

#[test]
fn test_empty_schema_defaults_to_false() {
	let schema = Schema::new();
	for kind in ElementKind::ALL {
		assert!(!schema.is_void_kind(kind));
		assert!(!schema.is_inline_kind(kind));
	}
	assert!(schema.is_block(&Element::paragraph("").into()));
	assert!(!schema.is_block(&Node::text("x")));
}

#[test]
fn test_defaults_mark_mentions_and_query_widgets() {
	let schema = Schema::with_defaults();
	assert!(schema.is_void_kind(ElementKind::Mention));
	assert!(schema.is_inline_kind(ElementKind::Mention));
	assert!(schema.is_void_kind(ElementKind::QueryVoid));
	assert!(!schema.is_inline_kind(ElementKind::QueryVoid));
	assert!(!schema.is_void_kind(ElementKind::Paragraph));
}

#[test]
fn test_later_extension_wins_for_its_kinds_only() {
	let mut schema = Schema::new();
	schema.install(KindOverrides::new("a").void(ElementKind::Mention).void(ElementKind::Todo));
	schema.install(KindOverrides::new("b").set_void(ElementKind::Mention, false));

	assert!(!schema.is_void_kind(ElementKind::Mention));
	assert!(schema.is_void_kind(ElementKind::Todo));
	assert_eq!(schema.extension_names().collect::<Vec<_>>(), ["a", "b"]);
}

#[test]
fn test_fn_extension_delegates_on_none() {
	let mut schema = Schema::new();
	schema.install(KindOverrides::new("base").inline(ElementKind::Mention));
	schema.install(FnExtension::new("todo-inline").on_inline(|kind| (kind == ElementKind::Todo).then_some(true)));

	assert!(schema.is_inline_kind(ElementKind::Todo));
	assert!(schema.is_inline_kind(ElementKind::Mention));
	assert!(!schema.is_inline_kind(ElementKind::Paragraph));
	assert!(!schema.is_void_kind(ElementKind::Todo));
}
