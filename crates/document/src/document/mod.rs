//! The document tree and its read-only queries.

use quire_primitives::movement::{step_back, step_forward};
use quire_primitives::{Affinity, CharIdx, EditError, Location, Path, Point, Range, Result, Unit};
use serde::{Deserialize, Serialize};

use crate::node::{Element, Node, Text};
use crate::schema::Schema;

mod positions;

pub(crate) use positions::BlockText;


/// Converts a char offset into a byte offset, clamping at the end of `text`.
pub(crate) fn byte_offset(text: &str, char_idx: CharIdx) -> usize {
	text.char_indices().nth(char_idx).map_or(text.len(), |(byte, _)| byte)
}

/// Returns the chars `start..end` of `text`.
pub(crate) fn char_slice(text: &str, start: CharIdx, end: CharIdx) -> &str {
	&text[byte_offset(text, start)..byte_offset(text, end)]
}

/// A tree of block elements.
///
/// The document exclusively owns its nodes. Mutation happens through
/// [`Transform`](crate::Transform); everything here only reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
	children: Vec<Node>,
}

impl Default for Document {
	/// A document holding one empty paragraph.
	fn default() -> Self {
		Self::new(vec![Element::paragraph("").into()])
	}
}

impl Document {
	pub fn new(children: Vec<Node>) -> Self {
		Self { children }
	}

	/// Top-level blocks.
	pub fn children(&self) -> &[Node] {
		&self.children
	}

	/// Returns the node at `path`. The root itself is not a node.
	pub fn node(&self, path: &Path) -> Result<&Node> {
		let (&first, rest) = path.as_slice().split_first().ok_or_else(|| EditError::NotFound(path.clone()))?;
		let mut node = self.children.get(first).ok_or_else(|| EditError::NotFound(path.clone()))?;
		for &index in rest {
			node = node.children().get(index).ok_or_else(|| EditError::NotFound(path.clone()))?;
		}
		Ok(node)
	}

	pub(crate) fn node_mut(&mut self, path: &Path) -> Result<&mut Node> {
		let missing = || EditError::NotFound(path.clone());
		let (&first, rest) = path.as_slice().split_first().ok_or_else(missing)?;
		let mut node = self.children.get_mut(first).ok_or_else(missing)?;
		for &index in rest {
			node = node.children_mut().and_then(|c| c.get_mut(index)).ok_or_else(missing)?;
		}
		Ok(node)
	}

	/// Children of the root or of the element at `path`.
	pub fn children_at(&self, path: &Path) -> Result<&[Node]> {
		if path.is_root() {
			return Ok(&self.children);
		}
		match self.node(path)? {
			Node::Element(element) => Ok(&element.children),
			Node::Text(_) => Err(EditError::NotFound(path.child(0))),
		}
	}

	pub(crate) fn children_at_mut(&mut self, path: &Path) -> Result<&mut Vec<Node>> {
		if path.is_root() {
			return Ok(&mut self.children);
		}
		let child = path.child(0);
		self.node_mut(path)?.children_mut().ok_or(EditError::NotFound(child))
	}

	pub fn has_path(&self, path: &Path) -> bool {
		path.is_root() || self.node(path).is_ok()
	}

	/// Returns the text run at `path`.
	pub fn text(&self, path: &Path) -> Result<&Text> {
		self.node(path)?.as_text().ok_or_else(|| EditError::invalid(path.clone()))
	}

	pub(crate) fn text_mut(&mut self, path: &Path) -> Result<&mut Text> {
		match self.node_mut(path)? {
			Node::Text(text) => Ok(text),
			Node::Element(_) => Err(EditError::invalid(path.clone())),
		}
	}

	/// Confirms `point` addresses a text run and an offset within it.
	pub fn check_point(&self, point: &Point) -> Result<()> {
		match self.text(&point.path) {
			Ok(text) if point.offset <= text.len() => Ok(()),
			_ => Err(EditError::invalid(point.clone())),
		}
	}

	pub fn check_location(&self, location: &Location) -> Result<()> {
		match location {
			Location::Path(path) if self.has_path(path) => Ok(()),
			Location::Path(path) => Err(EditError::invalid(path.clone())),
			Location::Point(point) => self.check_point(point),
			Location::Range(range) => {
				if self.check_point(&range.anchor).is_ok() && self.check_point(&range.focus).is_ok() {
					Ok(())
				} else {
					Err(EditError::invalid(range.clone()))
				}
			}
		}
	}

	/// Path of the first text run at or below `path`.
	pub fn first_text(&self, path: &Path) -> Result<Path> {
		self.leaf_text(path, |_| 0)
	}

	/// Path of the last text run at or below `path`.
	pub fn last_text(&self, path: &Path) -> Result<Path> {
		self.leaf_text(path, |len| len - 1)
	}

	fn leaf_text(&self, path: &Path, pick: impl Fn(usize) -> usize) -> Result<Path> {
		let mut current = path.clone();
		loop {
			let children = match self.children_at(&current) {
				Ok(children) => children,
				Err(_) if self.node(&current)?.is_text() => return Ok(current),
				Err(err) => return Err(err),
			};
			if children.is_empty() {
				return Err(EditError::NotFound(current.child(0)));
			}
			current = current.child(pick(children.len()));
		}
	}

	/// First point at or below `path`.
	pub fn start(&self, path: &Path) -> Result<Point> {
		Ok(Point::new(self.first_text(path)?, 0))
	}

	/// Last point at or below `path`.
	pub fn end(&self, path: &Path) -> Result<Point> {
		let text = self.last_text(path)?;
		let len = self.text(&text)?.len();
		Ok(Point::new(text, len))
	}

	/// Resolves a location to the range it spans.
	pub fn range(&self, location: &Location) -> Result<Range> {
		self.check_location(location)?;
		Ok(match location {
			Location::Path(path) => Range::new(self.start(path)?, self.end(path)?),
			Location::Point(point) => Range::collapsed(point.clone()),
			Location::Range(range) => range.clone(),
		})
	}

	/// Every text run in document order.
	pub fn texts(&self) -> Vec<(Path, &Text)> {
		fn walk<'a>(nodes: &'a [Node], path: &Path, out: &mut Vec<(Path, &'a Text)>) {
			for (i, node) in nodes.iter().enumerate() {
				let child = path.child(i);
				match node {
					Node::Text(text) => out.push((child, text)),
					Node::Element(element) => walk(&element.children, &child, out),
				}
			}
		}
		let mut out = Vec::new();
		walk(&self.children, &Path::root(), &mut out);
		out
	}

	/// Text runs from `from` through `to`, in document order. Only the
	/// branches between the two paths are visited.
	fn texts_between(&self, from: &Path, to: &Path) -> Vec<(Path, &Text)> {
		fn walk<'a>(nodes: &'a [Node], parent: &Path, from: &Path, to: &Path, out: &mut Vec<(Path, &'a Text)>) {
			let first = if parent.is_ancestor_of(from) {
				from.as_slice()[parent.len()]
			} else {
				0
			};
			for (i, node) in nodes.iter().enumerate().skip(first) {
				let path = parent.child(i);
				if path.is_after(to) {
					break;
				}
				match node {
					Node::Text(text) => out.push((path, text)),
					Node::Element(element) => walk(&element.children, &path, from, to, out),
				}
			}
		}
		let mut out = Vec::new();
		walk(&self.children, &Path::root(), from, to, &mut out);
		out
	}

	/// Text of every run intersecting `range`, in document order, without
	/// separators between blocks.
	pub fn string(&self, range: &Range) -> String {
		let (start, end) = range.edges();
		let mut out = String::new();
		for (path, text) in self.texts_between(&start.path, &end.path) {
			let from = if path == start.path { start.offset } else { 0 };
			let to = if path == end.path { end.offset } else { text.len() };
			if from < to {
				out.push_str(char_slice(&text.text, from, to));
			}
		}
		out
	}

	/// Deepest block element containing `path`, the path itself included.
	pub fn block_of(&self, path: &Path, schema: &Schema) -> Option<Path> {
		let own = std::iter::once(path.clone());
		path.ancestors()
			.chain(own)
			.filter(|p| self.node(p).is_ok_and(|n| schema.is_block(n)))
			.last()
	}

	/// Highest void element containing `path`, the path itself included.
	pub fn void_ancestor(&self, path: &Path, schema: &Schema) -> Option<Path> {
		let own = std::iter::once(path.clone());
		path.ancestors()
			.chain(own)
			.find(|p| self.node(p).is_ok_and(|n| schema.is_void(n)))
	}

	/// The leaf block before `block`, found by walking up to the nearest
	/// earlier sibling and down its last branch.
	pub(crate) fn prev_leaf_block(&self, block: &Path, schema: &Schema) -> Option<Path> {
		let mut current = block.clone();
		loop {
			match current.previous() {
				Some(prev) if self.node(&prev).is_ok_and(|n| schema.is_block(n)) => {
					return self.edge_leaf_block(prev, schema, true);
				}
				Some(prev) => current = prev,
				None => current = current.parent().filter(|p| !p.is_root())?,
			}
		}
	}

	/// The leaf block after `block`, found by walking up to the nearest
	/// later sibling and down its first branch.
	pub(crate) fn next_leaf_block(&self, block: &Path, schema: &Schema) -> Option<Path> {
		let mut current = block.clone();
		loop {
			let next = current.next();
			match self.node(&next) {
				Ok(node) if schema.is_block(node) => return self.edge_leaf_block(next, schema, false),
				Ok(_) => current = next,
				Err(_) => current = current.parent().filter(|p| !p.is_root())?,
			}
		}
	}

	/// Descends from the block at `path` to its first leaf block, or its last
	/// with `last`.
	fn edge_leaf_block(&self, mut path: Path, schema: &Schema, last: bool) -> Option<Path> {
		loop {
			let node = self.node(&path).ok()?;
			let children = node.children();
			if schema.is_void(node) || !children.iter().any(|c| schema.is_block(c)) {
				return Some(path);
			}
			path = path.child(if last { children.len() - 1 } else { 0 });
		}
	}

	/// The point one `unit` before `point`, or `None` at the document start.
	pub fn before(&self, point: &Point, unit: Unit, schema: &Schema) -> Option<Point> {
		let block = self.block_of(&point.path, schema)?;
		let text = BlockText::build(self, &block, schema).ok()?;
		let offset = text.offset_of(point, Affinity::Backward)?;
		match step_back(&text.text, offset, unit) {
			Some(target) => text.point_at(target, Affinity::Backward),
			None => {
				let prev = self.prev_leaf_block(&block, schema)?;
				BlockText::build(self, &prev, schema).ok()?.end_point()
			}
		}
	}

	/// The point one `unit` after `point`, or `None` at the document end.
	pub fn after(&self, point: &Point, unit: Unit, schema: &Schema) -> Option<Point> {
		let block = self.block_of(&point.path, schema)?;
		let text = BlockText::build(self, &block, schema).ok()?;
		let offset = text.offset_of(point, Affinity::Forward)?;
		match step_forward(&text.text, offset, unit) {
			Some(target) => text.point_at(target, Affinity::Forward),
			None => {
				let next = self.next_leaf_block(&block, schema)?;
				BlockText::build(self, &next, schema).ok()?.start_point()
			}
		}
	}

	/// Returns true if `point` is the first position of the node at `path`.
	pub fn is_start(&self, point: &Point, path: &Path) -> bool {
		self.start(path).is_ok_and(|start| start == *point)
	}

	/// Returns true if `point` is the last position of the node at `path`.
	pub fn is_end(&self, point: &Point, path: &Path) -> bool {
		self.end(path).is_ok_and(|end| end == *point)
	}

	/// Checks the structural invariants of the tree.
	///
	/// The root holds at least one block, elements are never empty, voids hold
	/// a single empty text run, and an element's children are either all
	/// blocks or all inline-level.
	pub fn validate(&self, schema: &Schema) -> Result<()> {
		if self.children.is_empty() {
			return Err(EditError::schema(Path::root(), "document must contain at least one block"));
		}
		for (i, node) in self.children.iter().enumerate() {
			let path = Path::new([i]);
			if !schema.is_block(node) {
				return Err(EditError::schema(path, "top-level nodes must be blocks"));
			}
			validate_node(node, &path, schema)?;
		}
		Ok(())
	}
}

/// Checks that `node` is a well-formed subtree.
pub(crate) fn validate_node(node: &Node, path: &Path, schema: &Schema) -> Result<()> {
	let Node::Element(element) = node else {
		return Ok(());
	};
	if element.children.is_empty() {
		return Err(EditError::schema(path.clone(), "elements must have children"));
	}
	if schema.is_void(node) {
		return match element.children.as_slice() {
			[Node::Text(text)] if text.is_empty() => Ok(()),
			_ => Err(EditError::schema(path.clone(), "void elements hold exactly one empty text run")),
		};
	}
	let inline_level = element.children.iter().filter(|c| schema.is_inline_level(c)).count();
	if inline_level != 0 && inline_level != element.children.len() {
		return Err(EditError::schema(path.clone(), "children mix blocks and inline content"));
	}
	if schema.is_inline(node) && inline_level == 0 {
		return Err(EditError::schema(path.clone(), "inline elements hold inline content"));
	}
	for (i, child) in element.children.iter().enumerate() {
		validate_node(child, &path.child(i), schema)?;
	}
	Ok(())
}
