//! Schema extension layer.
//!
//! A [`Schema`] answers whether an element kind is void or inline. The answer
//! comes from an ordered chain of [`SchemaExtension`]s: the most recently
//! installed extension with an opinion on a kind wins, and a kind nobody
//! recognises is neither void nor inline.

use std::collections::BTreeMap;
use std::fmt;

use crate::node::{ElementKind, Node};

#[cfg(test)]
mod tests;

/// A behaviour extension consulted by the [`Schema`].
///
/// Returning `None` delegates the question to extensions installed earlier.
pub trait SchemaExtension: Send + Sync {
	/// Name used in logs.
	fn name(&self) -> &str;

	fn is_void(&self, kind: ElementKind) -> Option<bool> {
		let _ = kind;
		None
	}

	fn is_inline(&self, kind: ElementKind) -> Option<bool> {
		let _ = kind;
		None
	}
}

/// Declarative extension overriding predicates for a fixed set of kinds.
///
/// ```
/// # use quire_document::{ElementKind, KindOverrides};
/// let mentions = KindOverrides::new("mentions")
/// 	.void(ElementKind::Mention)
/// 	.inline(ElementKind::Mention);
/// ```
#[derive(Debug, Clone)]
pub struct KindOverrides {
	name: String,
	void: BTreeMap<ElementKind, bool>,
	inline: BTreeMap<ElementKind, bool>,
}

impl KindOverrides {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			void: BTreeMap::new(),
			inline: BTreeMap::new(),
		}
	}

	/// Marks `kind` as void.
	pub fn void(self, kind: ElementKind) -> Self {
		self.set_void(kind, true)
	}

	/// Marks `kind` as inline.
	pub fn inline(self, kind: ElementKind) -> Self {
		self.set_inline(kind, true)
	}

	pub fn set_void(mut self, kind: ElementKind, value: bool) -> Self {
		self.void.insert(kind, value);
		self
	}

	pub fn set_inline(mut self, kind: ElementKind, value: bool) -> Self {
		self.inline.insert(kind, value);
		self
	}
}

impl SchemaExtension for KindOverrides {
	fn name(&self) -> &str {
		&self.name
	}

	fn is_void(&self, kind: ElementKind) -> Option<bool> {
		self.void.get(&kind).copied()
	}

	fn is_inline(&self, kind: ElementKind) -> Option<bool> {
		self.inline.get(&kind).copied()
	}
}

type Predicate = Box<dyn Fn(ElementKind) -> Option<bool> + Send + Sync>;

/// Closure-backed extension.
pub struct FnExtension {
	name: String,
	void: Option<Predicate>,
	inline: Option<Predicate>,
}

impl FnExtension {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			void: None,
			inline: None,
		}
	}

	pub fn on_void(mut self, f: impl Fn(ElementKind) -> Option<bool> + Send + Sync + 'static) -> Self {
		self.void = Some(Box::new(f));
		self
	}

	pub fn on_inline(mut self, f: impl Fn(ElementKind) -> Option<bool> + Send + Sync + 'static) -> Self {
		self.inline = Some(Box::new(f));
		self
	}
}

impl fmt::Debug for FnExtension {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FnExtension")
			.field("name", &self.name)
			.field("void", &self.void.is_some())
			.field("inline", &self.inline.is_some())
			.finish()
	}
}

impl SchemaExtension for FnExtension {
	fn name(&self) -> &str {
		&self.name
	}

	fn is_void(&self, kind: ElementKind) -> Option<bool> {
		self.void.as_ref().and_then(|f| f(kind))
	}

	fn is_inline(&self, kind: ElementKind) -> Option<bool> {
		self.inline.as_ref().and_then(|f| f(kind))
	}
}

/// The ordered chain of installed extensions.
#[derive(Default)]
pub struct Schema {
	extensions: Vec<Box<dyn SchemaExtension>>,
}

impl Schema {
	/// A schema with no extensions: every element is a non-void block.
	pub fn new() -> Self {
		Self::default()
	}

	/// The base editor set: mentions are inline voids, query widgets are block voids.
	pub fn with_defaults() -> Self {
		let mut schema = Self::new();
		schema.install(
			KindOverrides::new("mentions")
				.void(ElementKind::Mention)
				.inline(ElementKind::Mention),
		);
		schema.install(KindOverrides::new("query-widgets").void(ElementKind::QueryVoid));
		schema
	}

	/// Appends an extension. Later extensions take precedence.
	pub fn install(&mut self, extension: impl SchemaExtension + 'static) {
		tracing::trace!(name = extension.name(), "schema extension installed");
		self.extensions.push(Box::new(extension));
	}

	/// Names of installed extensions in installation order.
	pub fn extension_names(&self) -> impl Iterator<Item = &str> {
		self.extensions.iter().map(|ext| ext.name())
	}

	fn resolve(&self, query: impl Fn(&dyn SchemaExtension) -> Option<bool>) -> bool {
		self.extensions
			.iter()
			.rev()
			.find_map(|ext| query(ext.as_ref()))
			.unwrap_or(false)
	}

	pub fn is_void_kind(&self, kind: ElementKind) -> bool {
		self.resolve(|ext| ext.is_void(kind))
	}

	pub fn is_inline_kind(&self, kind: ElementKind) -> bool {
		self.resolve(|ext| ext.is_inline(kind))
	}

	/// Returns true for void elements. Text runs are never void.
	pub fn is_void(&self, node: &Node) -> bool {
		node.kind().is_some_and(|kind| self.is_void_kind(kind))
	}

	/// Returns true for inline elements. Text runs are not elements.
	pub fn is_inline(&self, node: &Node) -> bool {
		node.kind().is_some_and(|kind| self.is_inline_kind(kind))
	}

	/// Returns true for elements that are not inline.
	pub fn is_block(&self, node: &Node) -> bool {
		node.kind().is_some_and(|kind| !self.is_inline_kind(kind))
	}

	/// Returns true for text runs and inline elements.
	pub fn is_inline_level(&self, node: &Node) -> bool {
		node.is_text() || self.is_inline(node)
	}
}

impl fmt::Debug for Schema {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.extension_names()).finish()
	}
}
