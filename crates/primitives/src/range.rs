use std::fmt;

use serde::{Deserialize, Serialize};

use crate::path::Path;

/// An offset into a text run, measured in characters (not bytes).
pub type CharIdx = usize;

/// Which side a point sticks to when content is inserted exactly at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affinity {
	/// Point stays before content inserted at its position.
	Backward,
	/// Point moves after content inserted at its position.
	Forward,
}

/// One end of a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Edge {
	Anchor,
	Focus,
	Start,
	End,
}

/// A position in the document: a text run and a character offset into it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
	/// Path of the text run.
	pub path: Path,
	/// Character offset into the run's text.
	pub offset: CharIdx,
}

impl Point {
	pub fn new(path: impl Into<Path>, offset: CharIdx) -> Self {
		Self {
			path: path.into(),
			offset,
		}
	}
}

impl fmt::Display for Point {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.path, self.offset)
	}
}

/// A span between two points.
///
/// The anchor is the fixed end and the focus the moving end. A range whose
/// ends coincide is collapsed and represents a plain cursor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
	pub anchor: Point,
	pub focus: Point,
}

impl Range {
	pub fn new(anchor: Point, focus: Point) -> Self {
		Self { anchor, focus }
	}

	/// Creates a collapsed range at `point`.
	pub fn collapsed(point: Point) -> Self {
		Self {
			anchor: point.clone(),
			focus: point,
		}
	}

	#[inline]
	pub fn is_collapsed(&self) -> bool {
		self.anchor == self.focus
	}

	#[inline]
	pub fn is_expanded(&self) -> bool {
		!self.is_collapsed()
	}

	/// Returns true if the focus comes before the anchor.
	#[inline]
	pub fn is_backward(&self) -> bool {
		self.focus < self.anchor
	}

	/// Returns `(start, end)` in document order.
	pub fn edges(&self) -> (&Point, &Point) {
		if self.is_backward() {
			(&self.focus, &self.anchor)
		} else {
			(&self.anchor, &self.focus)
		}
	}

	pub fn start(&self) -> &Point {
		self.edges().0
	}

	pub fn end(&self) -> &Point {
		self.edges().1
	}

	/// Returns the point at the given edge.
	pub fn edge(&self, edge: Edge) -> &Point {
		match edge {
			Edge::Anchor => &self.anchor,
			Edge::Focus => &self.focus,
			Edge::Start => self.start(),
			Edge::End => self.end(),
		}
	}

	/// Returns true if `point` lies within the range, edges included.
	pub fn includes(&self, point: &Point) -> bool {
		let (start, end) = self.edges();
		start <= point && point <= end
	}

	/// Applies a function to both points.
	pub fn map(self, mut f: impl FnMut(Point) -> Point) -> Self {
		Self {
			anchor: f(self.anchor),
			focus: f(self.focus),
		}
	}
}

impl fmt::Display for Range {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}..{}", self.anchor, self.focus)
	}
}

/// Anything a transform can be targeted at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Location {
	Path(Path),
	Point(Point),
	Range(Range),
}

impl From<Path> for Location {
	fn from(path: Path) -> Self {
		Self::Path(path)
	}
}

impl From<Point> for Location {
	fn from(point: Point) -> Self {
		Self::Point(point)
	}
}

impl From<Range> for Location {
	fn from(range: Range) -> Self {
		Self::Range(range)
	}
}

impl fmt::Display for Location {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Location::Path(path) => write!(f, "path {path}"),
			Location::Point(point) => write!(f, "point {point}"),
			Location::Range(range) => write!(f, "range {range}"),
		}
	}
}
