//! Render contract between the document and a host view.
//!
//! A [`RenderRegistry`] holds one function per element kind and one for text
//! runs. A render pass calls exactly one function per node, children before
//! parents, and hands each a [`NodeAttachment`] that maps interaction on the
//! rendered output back to the node. Attachments are valid until the next
//! change to the document.

use std::collections::HashMap;

use quire_document::{Document, Element, ElementKind, Node, Path, Schema, Text};

/// Where a rendered node lives in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeAttachment {
	pub path: Path,
	pub void: bool,
	pub inline: bool,
}

/// Input of an element render function.
pub struct ElementView<'a, O> {
	pub element: &'a Element,
	pub children: Vec<O>,
	pub attachment: NodeAttachment,
}

/// Input of the text render function.
pub struct TextView<'a> {
	pub text: &'a Text,
	pub attachment: NodeAttachment,
}

type ElementFn<O> = Box<dyn Fn(ElementView<'_, O>) -> O>;
type TextFn<O> = Box<dyn Fn(TextView<'_>) -> O>;

pub struct RenderRegistry<O> {
	text: TextFn<O>,
	fallback: ElementFn<O>,
	elements: HashMap<ElementKind, ElementFn<O>>,
}

impl<O> RenderRegistry<O> {
	/// A registry rendering text with `text` and every element with `element`
	/// until a kind gets its own function.
	pub fn new(
		text: impl Fn(TextView<'_>) -> O + 'static,
		element: impl Fn(ElementView<'_, O>) -> O + 'static,
	) -> Self {
		Self {
			text: Box::new(text),
			fallback: Box::new(element),
			elements: HashMap::new(),
		}
	}

	pub fn element(mut self, kind: ElementKind, f: impl Fn(ElementView<'_, O>) -> O + 'static) -> Self {
		self.elements.insert(kind, Box::new(f));
		self
	}

	/// Renders every top-level block.
	pub fn render(&self, document: &Document, schema: &Schema) -> Vec<O> {
		document
			.children()
			.iter()
			.enumerate()
			.map(|(i, node)| self.render_node(node, Path::new([i]), schema))
			.collect()
	}

	fn render_node(&self, node: &Node, path: Path, schema: &Schema) -> O {
		let attachment = NodeAttachment {
			void: schema.is_void(node),
			inline: schema.is_inline(node),
			path,
		};
		match node {
			Node::Text(text) => (self.text)(TextView { text, attachment }),
			Node::Element(element) => {
				let children = element
					.children
					.iter()
					.enumerate()
					.map(|(i, child)| self.render_node(child, attachment.path.child(i), schema))
					.collect();
				let render = self.elements.get(&element.kind).unwrap_or(&self.fallback);
				render(ElementView {
					element,
					children,
					attachment,
				})
			}
		}
	}
}

impl RenderRegistry<String> {
	/// Plain markup: `<kind>` tags around children, voids as `<kind attrs/>`,
	/// marked runs as `[mark,..]{text}`.
	pub fn markup() -> Self {
		RenderRegistry::new(
			|view| {
				let marks: Vec<&str> = view
					.text
					.marks
					.iter()
					.filter(|(_, value)| quire_document::node::is_truthy(value))
					.map(|(name, _)| name.as_str())
					.collect();
				if marks.is_empty() {
					view.text.text.clone()
				} else {
					format!("[{}]{{{}}}", marks.join(","), view.text.text)
				}
			},
			|view| {
				let kind = view.element.kind;
				let attrs: String = view
					.element
					.attrs
					.iter()
					.map(|(name, value)| format!(" {name}={value}"))
					.collect();
				if view.attachment.void {
					format!("<{kind}{attrs}/>")
				} else {
					format!("<{kind}{attrs}>{}</{kind}>", view.children.concat())
				}
			},
		)
	}
}
