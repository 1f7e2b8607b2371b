//! Node model: text runs and typed elements.
//!
//! Nodes serialize to the JSON shape rich-text hosts exchange:
//! `{"text": "hi", "bold": true}` for runs and
//! `{"type": "paragraph", "children": [...]}` for elements, with element
//! attributes flattened next to `type`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[cfg(test)]
mod tests;

/// Style marks carried by a text run, e.g. `bold: true`.
pub type Marks = BTreeMap<String, Value>;

/// Element payload, e.g. the task record referenced by a mention.
pub type Attrs = BTreeMap<String, Value>;

/// Returns whether a mark or attribute value counts as set.
pub fn is_truthy(value: &Value) -> bool {
	!matches!(value, Value::Null | Value::Bool(false))
}

/// The closed set of element kinds.
///
/// Whether a kind is void, inline or block is decided by the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
	Paragraph,
	Todo,
	Mention,
	QueryVoid,
}

impl ElementKind {
	pub const ALL: [ElementKind; 4] = [
		ElementKind::Paragraph,
		ElementKind::Todo,
		ElementKind::Mention,
		ElementKind::QueryVoid,
	];

	pub fn name(self) -> &'static str {
		match self {
			ElementKind::Paragraph => "paragraph",
			ElementKind::Todo => "todo",
			ElementKind::Mention => "mention",
			ElementKind::QueryVoid => "query-void",
		}
	}
}

impl fmt::Display for ElementKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Error returned when parsing an unknown element kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown element kind `{0}`")]
pub struct UnknownKind(pub String);

impl FromStr for ElementKind {
	type Err = UnknownKind;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|kind| kind.name() == s)
			.ok_or_else(|| UnknownKind(s.to_string()))
	}
}

/// A run of text sharing one set of marks. Always a leaf.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Text {
	pub text: String,
	#[serde(flatten)]
	pub marks: Marks,
}

impl Text {
	pub fn new(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			marks: Marks::new(),
		}
	}

	/// The empty run used as a placeholder child of void elements.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Returns a copy with `name` set to `true`.
	pub fn with_mark(mut self, name: &str) -> Self {
		self.marks.insert(name.to_string(), Value::Bool(true));
		self
	}

	pub fn with_marks(mut self, marks: Marks) -> Self {
		self.marks = marks;
		self
	}

	/// Length in characters.
	pub fn len(&self) -> usize {
		self.text.chars().count()
	}

	pub fn is_empty(&self) -> bool {
		self.text.is_empty()
	}

	pub fn has_mark(&self, name: &str) -> bool {
		self.marks.get(name).is_some_and(is_truthy)
	}
}

/// A typed node with children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
	#[serde(rename = "type")]
	pub kind: ElementKind,
	pub children: Vec<Node>,
	#[serde(flatten)]
	pub attrs: Attrs,
}

impl Element {
	pub fn new(kind: ElementKind, children: Vec<Node>) -> Self {
		Self {
			kind,
			children,
			attrs: Attrs::new(),
		}
	}

	pub fn paragraph(text: impl Into<String>) -> Self {
		Self::new(ElementKind::Paragraph, vec![Node::text(text)])
	}

	pub fn todo(text: impl Into<String>, checked: bool) -> Self {
		Self::new(ElementKind::Todo, vec![Node::text(text)]).with_attr("checked", Value::Bool(checked))
	}

	/// A void element of `kind` holding the mandatory empty text child.
	pub fn void(kind: ElementKind) -> Self {
		Self::new(kind, vec![Node::Text(Text::empty())])
	}

	/// A mention referencing `task`.
	pub fn mention(task: Value) -> Self {
		Self::void(ElementKind::Mention).with_attr("task", task)
	}

	pub fn query_void() -> Self {
		Self::void(ElementKind::QueryVoid)
	}

	pub fn with_attr(mut self, name: &str, value: Value) -> Self {
		self.attrs.insert(name.to_string(), value);
		self
	}

	pub fn attr(&self, name: &str) -> Option<&Value> {
		self.attrs.get(name)
	}
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
	Text(Text),
	Element(Element),
}

impl Node {
	pub fn text(text: impl Into<String>) -> Self {
		Self::Text(Text::new(text))
	}

	pub fn is_text(&self) -> bool {
		matches!(self, Node::Text(_))
	}

	pub fn as_text(&self) -> Option<&Text> {
		match self {
			Node::Text(text) => Some(text),
			Node::Element(_) => None,
		}
	}

	pub fn as_element(&self) -> Option<&Element> {
		match self {
			Node::Element(element) => Some(element),
			Node::Text(_) => None,
		}
	}

	pub fn kind(&self) -> Option<ElementKind> {
		self.as_element().map(|e| e.kind)
	}

	/// Children of an element; empty for text runs.
	pub fn children(&self) -> &[Node] {
		match self {
			Node::Element(element) => &element.children,
			Node::Text(_) => &[],
		}
	}

	pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
		match self {
			Node::Element(element) => Some(&mut element.children),
			Node::Text(_) => None,
		}
	}

	/// Concatenated text of every run below this node.
	pub fn string(&self) -> String {
		match self {
			Node::Text(text) => text.text.clone(),
			Node::Element(element) => element.children.iter().map(Node::string).collect(),
		}
	}

	/// The properties `props` would overwrite, captured so they can be restored.
	pub fn snapshot(&self, props: &Props) -> Props {
		let (kind, current) = match self {
			Node::Text(text) => (None, &text.marks),
			Node::Element(element) => (props.kind.map(|_| element.kind), &element.attrs),
		};
		let attrs = props
			.attrs
			.keys()
			.map(|key| (key.clone(), current.get(key).cloned().unwrap_or(Value::Null)))
			.collect();
		Props { kind, attrs }
	}

	/// Returns true if applying `props` would change this node.
	pub fn differs(&self, props: &Props) -> bool {
		let (kind_changes, current) = match self {
			Node::Text(text) => (false, &text.marks),
			Node::Element(element) => (props.kind.is_some_and(|k| k != element.kind), &element.attrs),
		};
		kind_changes
			|| props.attrs.iter().any(|(key, value)| match current.get(key) {
				Some(existing) => existing != value,
				None => !value.is_null(),
			})
	}

	/// Merges `props` into this node. `null` values remove the key.
	pub(crate) fn apply_props(&mut self, props: &Props) {
		let target = match self {
			Node::Text(text) => &mut text.marks,
			Node::Element(element) => {
				if let Some(kind) = props.kind {
					element.kind = kind;
				}
				&mut element.attrs
			}
		};
		for (key, value) in &props.attrs {
			if value.is_null() {
				target.remove(key);
			} else {
				target.insert(key.clone(), value.clone());
			}
		}
	}

	/// The properties a split-off sibling of this node inherits.
	pub(crate) fn split_props(&self) -> Props {
		match self {
			Node::Text(text) => Props {
				kind: None,
				attrs: text.marks.clone(),
			},
			Node::Element(element) => Props {
				kind: Some(element.kind),
				attrs: element.attrs.clone(),
			},
		}
	}
}

impl From<Text> for Node {
	fn from(text: Text) -> Self {
		Node::Text(text)
	}
}

impl From<Element> for Node {
	fn from(element: Element) -> Self {
		Node::Element(element)
	}
}

/// A property patch for [`Transform::set_nodes`](crate::Transform::set_nodes).
///
/// On text runs `attrs` are marks and `kind` is ignored; on elements `kind`
/// replaces the element kind and `attrs` merge into its attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
	pub kind: Option<ElementKind>,
	pub attrs: Attrs,
}

impl Props {
	pub fn kind(kind: ElementKind) -> Self {
		Self {
			kind: Some(kind),
			attrs: Attrs::new(),
		}
	}

	/// Sets a boolean mark.
	pub fn mark(name: &str) -> Self {
		Self::default().with(name, Value::Bool(true))
	}

	/// Removes a mark or attribute.
	pub fn unset(name: &str) -> Self {
		Self::default().with(name, Value::Null)
	}

	pub fn with(mut self, name: &str, value: Value) -> Self {
		self.attrs.insert(name.to_string(), value);
		self
	}

	pub fn is_empty(&self) -> bool {
		self.kind.is_none() && self.attrs.is_empty()
	}
}
