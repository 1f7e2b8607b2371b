//! The `nodes` query: matching nodes within a location, in document order.

use quire_primitives::{Location, Path, Point, Range, Result};

use crate::document::Document;
use crate::node::Node;
use crate::schema::Schema;

/// Which matches a [`Nodes`] query yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
	/// Every matching node.
	#[default]
	All,
	/// Only the topmost match of each branch; descendants of a match are skipped.
	Highest,
}

type Matcher<'m> = Box<dyn Fn(&Node, &Path) -> bool + 'm>;

/// Options for [`Document::nodes`].
#[derive(Default)]
pub struct NodesOptions<'m> {
	/// Where to search. `None` searches the whole document.
	pub at: Option<Location>,
	pub matcher: Option<Matcher<'m>>,
	pub mode: Mode,
	/// Require every text run under `at` to match, or yield nothing.
	pub universal: bool,
	/// Descend into void elements.
	pub voids: bool,
}

impl<'m> NodesOptions<'m> {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn at(mut self, at: impl Into<Location>) -> Self {
		self.at = Some(at.into());
		self
	}

	pub fn matching(mut self, f: impl Fn(&Node, &Path) -> bool + 'm) -> Self {
		self.matcher = Some(Box::new(f));
		self
	}

	pub fn mode(mut self, mode: Mode) -> Self {
		self.mode = mode;
		self
	}

	pub fn universal(mut self, universal: bool) -> Self {
		self.universal = universal;
		self
	}

	pub fn voids(mut self, voids: bool) -> Self {
		self.voids = voids;
		self
	}
}

/// A matched node and its path.
pub type NodeEntry<'a> = (&'a Node, Path);

/// Iterator over matching nodes. See [`Document::nodes`].
///
/// Traversal is lazy and forward-only; [`Nodes::restart`] rewinds it.
pub struct Nodes<'a> {
	document: &'a Document,
	schema: &'a Schema,
	matcher: Option<Matcher<'a>>,
	mode: Mode,
	voids: bool,
	span: Option<(Point, Point)>,
	cursor: Option<Path>,
	vacant: bool,
}

impl Document {
	/// Iterates the nodes within `options.at` that satisfy the matcher.
	///
	/// Text runs an expanded range only touches at one of its edges are left
	/// out.
	pub fn nodes<'a>(&'a self, schema: &'a Schema, options: NodesOptions<'a>) -> Result<Nodes<'a>> {
		let span = match &options.at {
			Some(at) => {
				let range = self.range(at)?;
				let (start, end) = range.edges();
				Some((start.clone(), end.clone()))
			}
			None => None,
		};
		let mut nodes = Nodes {
			document: self,
			schema,
			matcher: options.matcher,
			mode: options.mode,
			voids: options.voids,
			span,
			cursor: None,
			vacant: false,
		};
		nodes.restart();
		if options.universal && !nodes.every_text_matches() {
			nodes.vacant = true;
			nodes.cursor = None;
		}
		Ok(nodes)
	}
}

impl<'a> Nodes<'a> {
	/// Rewinds to the first node in range.
	///
	/// Traversal starts at the top-level block holding the range start, not
	/// at the document start.
	pub fn restart(&mut self) {
		self.cursor = if self.vacant || self.document.children().is_empty() {
			None
		} else {
			let first = self
				.span
				.as_ref()
				.and_then(|(start, _)| start.path.as_slice().first().copied())
				.unwrap_or(0);
			Some(Path::new([first]))
		};
	}

	fn matches(&self, node: &Node, path: &Path) -> bool {
		self.matcher.as_ref().is_none_or(|f| f(node, path))
	}

	/// Returns true for a text run the range only touches at an edge.
	fn touched_only(&self, node: &Node, path: &Path) -> bool {
		let (Some((start, end)), Some(text)) = (&self.span, node.as_text()) else {
			return false;
		};
		if start == end {
			return false;
		}
		(*path == end.path && end.offset == 0 && start.path != end.path)
			|| (*path == start.path && start.offset == text.len() && start.path != end.path)
	}

	fn every_text_matches(&self) -> bool {
		let mut walker = Nodes {
			document: self.document,
			schema: self.schema,
			matcher: None,
			mode: Mode::All,
			voids: self.voids,
			span: self.span.clone(),
			cursor: self.cursor.clone(),
			vacant: false,
		};
		let mut seen = false;
		while let Some((node, path)) = walker.advance() {
			if node.is_text() && !walker.touched_only(node, &path) {
				seen = true;
				if !self.matches(node, &path) {
					return false;
				}
			}
		}
		seen
	}

	/// Steps to the next node in range, regardless of the matcher.
	fn advance(&mut self) -> Option<NodeEntry<'a>> {
		loop {
			let path = self.cursor.take()?;
			let node = self.document.node(&path).ok()?;

			if let Some((start, end)) = &self.span {
				if path.is_before(&start.path) {
					self.cursor = self.skip_to_ancestor(&path, &start.path);
					continue;
				}
				if path.is_after(&end.path) {
					return None;
				}
			}

			let descend = self.voids || !self.schema.is_void(node);
			self.cursor = self.next_preorder(&path, descend);
			return Some((node, path));
		}
	}

	/// From `path`, a sibling before a branch leading to `target`, jumps to
	/// the head of that branch instead of stepping through the siblings.
	fn skip_to_ancestor(&self, path: &Path, target: &Path) -> Option<Path> {
		match path.parent() {
			Some(parent) if parent.is_ancestor_of(target) => {
				Some(Path::new(target.as_slice()[..path.len()].iter().copied()))
			}
			_ => self.next_preorder(path, false),
		}
	}

	fn next_preorder(&self, path: &Path, descend: bool) -> Option<Path> {
		if descend && !self.document.node(path).ok()?.children().is_empty() {
			return Some(path.child(0));
		}
		let mut current = path.clone();
		loop {
			let next = current.next();
			if self.document.has_path(&next) {
				return Some(next);
			}
			current = current.parent().filter(|p| !p.is_root())?;
		}
	}
}

impl<'a> Iterator for Nodes<'a> {
	type Item = NodeEntry<'a>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			let (node, path) = self.advance()?;
			if self.touched_only(node, &path) || !self.matches(node, &path) {
				continue;
			}
			if self.mode == Mode::Highest && !node.children().is_empty() {
				self.cursor = self.next_preorder(&path, false);
			}
			return Some((node, path));
		}
	}
}

/// Collects the paths of every match, for transforms that mutate as they go.
pub(crate) fn matching_paths(
	document: &Document,
	schema: &Schema,
	at: Range,
	mode: Mode,
	voids: bool,
	matcher: impl Fn(&Node, &Path) -> bool,
) -> Result<Vec<Path>> {
	let options = NodesOptions::new()
		.at(at)
		.mode(mode)
		.voids(voids)
		.matching(&matcher);
	Ok(document.nodes(schema, options)?.map(|(_, path)| path).collect())
}
