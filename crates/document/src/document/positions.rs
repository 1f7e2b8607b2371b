//! Linear view of a block used for cursor movement.
//!
//! A leaf block flattens to the concatenation of its text runs, with every
//! inline void standing in as one [`OBJECT_CHAR`]. Movement happens on that
//! string and the result is mapped back onto a text run.

use quire_primitives::movement::OBJECT_CHAR;
use quire_primitives::{Affinity, CharIdx, Path, Point, Result};

use super::Document;
use crate::node::Node;
use crate::schema::Schema;

/// One text run, or one inline void, of a [`BlockText`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Segment {
	/// Path of the text run. For an inline void, its placeholder text.
	pub path: Path,
	pub start: CharIdx,
	pub len: CharIdx,
	pub object: bool,
}

impl Segment {
	fn end(&self) -> CharIdx {
		self.start + self.len
	}
}

#[derive(Debug, Clone, Default)]
pub(crate) struct BlockText {
	pub text: String,
	pub segments: Vec<Segment>,
}

impl BlockText {
	/// Flattens the block at `block`.
	pub fn build(document: &Document, block: &Path, schema: &Schema) -> Result<Self> {
		let mut out = Self::default();
		let node = document.node(block)?;
		if schema.is_void(node) {
			out.segments.push(Segment {
				path: document.first_text(block)?,
				start: 0,
				len: 0,
				object: false,
			});
			return Ok(out);
		}
		out.push_children(node.children(), block, schema);
		Ok(out)
	}

	fn push_children(&mut self, nodes: &[Node], parent: &Path, schema: &Schema) {
		let mut cursor = self.text.chars().count();
		for (i, node) in nodes.iter().enumerate() {
			let path = parent.child(i);
			match node {
				Node::Text(text) => {
					let len = text.len();
					self.text.push_str(&text.text);
					self.segments.push(Segment {
						path,
						start: cursor,
						len,
						object: false,
					});
					cursor += len;
				}
				Node::Element(_) if schema.is_void(node) => {
					self.text.push(OBJECT_CHAR);
					self.segments.push(Segment {
						path: path.child(0),
						start: cursor,
						len: 1,
						object: true,
					});
					cursor += 1;
				}
				Node::Element(element) => {
					self.push_children(&element.children, &path, schema);
					cursor = self.text.chars().count();
				}
			}
		}
	}

	/// Linear offset of `point`.
	///
	/// A point inside an inline void sits before the object when moving
	/// forward and after it when moving backward, so a single step leaves it.
	pub fn offset_of(&self, point: &Point, affinity: Affinity) -> Option<CharIdx> {
		let segment = self.segments.iter().find(|s| s.path == point.path)?;
		Some(match (segment.object, affinity) {
			(true, Affinity::Forward) => segment.start,
			(true, Affinity::Backward) => segment.end(),
			(false, _) => segment.start + point.offset.min(segment.len),
		})
	}

	/// Maps a linear offset back onto a text run.
	///
	/// Where two runs meet, `Backward` picks the earlier one and `Forward` the
	/// later one. Inline voids are only chosen when no text run touches `offset`.
	pub fn point_at(&self, offset: CharIdx, affinity: Affinity) -> Option<Point> {
		let mut candidates = self
			.segments
			.iter()
			.filter(|s| !s.object && s.start <= offset && offset <= s.end());
		let chosen = match affinity {
			Affinity::Backward => candidates.next(),
			Affinity::Forward => candidates.last(),
		};
		match chosen {
			Some(segment) => Some(Point::new(segment.path.clone(), offset - segment.start)),
			None => self
				.segments
				.iter()
				.find(|s| s.start <= offset && offset <= s.end())
				.map(|s| Point::new(s.path.clone(), 0)),
		}
	}

	pub fn len(&self) -> CharIdx {
		self.segments.last().map_or(0, Segment::end)
	}

	pub fn start_point(&self) -> Option<Point> {
		self.point_at(0, Affinity::Forward)
	}

	pub fn end_point(&self) -> Option<Point> {
		self.point_at(self.len(), Affinity::Backward)
	}
}
