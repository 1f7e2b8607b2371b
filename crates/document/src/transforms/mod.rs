//! The transform engine.
//!
//! A [`Transform`] borrows the document, the selection and the schema for
//! one sequence of edits. Every public transform validates its arguments,
//! decomposes into [`Operation`]s and is atomic: on error, the operations it
//! already applied are inverted in reverse order and the selection is
//! restored.

use quire_primitives::{Affinity, Location, Path, Point, Range, Result};

use crate::document::Document;
use crate::operation::Operation;
use crate::schema::Schema;

mod nodes;
mod selection;
mod text;

pub use nodes::SetNodesOptions;
pub use selection::MoveOptions;
pub use text::DeleteOptions;


/// A position kept current while operations are applied.
#[derive(Debug, Clone)]
enum Tracked {
	Point(Option<Point>, Affinity),
	Path(Option<Path>, Affinity),
}

/// Handle to a tracked point. See [`Transform::point_ref`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PointRef(usize);

/// Handle to a tracked path. See [`Transform::path_ref`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PathRef(usize);

pub struct Transform<'a> {
	document: &'a mut Document,
	selection: &'a mut Option<Range>,
	schema: &'a Schema,
	operations: Vec<Operation>,
	refs: Vec<Option<Tracked>>,
}

impl<'a> Transform<'a> {
	pub fn new(document: &'a mut Document, selection: &'a mut Option<Range>, schema: &'a Schema) -> Self {
		Self {
			document,
			selection,
			schema,
			operations: Vec::new(),
			refs: Vec::new(),
		}
	}

	pub fn document(&self) -> &Document {
		self.document
	}

	pub fn selection(&self) -> Option<&Range> {
		self.selection.as_ref()
	}

	pub fn schema(&self) -> &'a Schema {
		self.schema
	}

	/// Operations applied so far, oldest first.
	pub fn operations(&self) -> &[Operation] {
		&self.operations
	}

	pub fn into_operations(self) -> Vec<Operation> {
		self.operations
	}

	/// Applies one operation and moves the selection and tracked refs across it.
	pub fn apply(&mut self, op: Operation) -> Result<()> {
		op.apply(self.document)?;
		tracing::trace!(op = %op, "apply");

		match &op {
			Operation::SetSelection { new, .. } => *self.selection = new.clone(),
			Operation::RemoveNode { path, .. } => {
				if let Some(range) = self.selection.take() {
					let anchor = self.relocate(&op, &range.anchor, path);
					let focus = self.relocate(&op, &range.focus, path);
					*self.selection = anchor.zip(focus).map(|(anchor, focus)| Range::new(anchor, focus));
				}
			}
			_ => {
				if let Some(range) = self.selection.as_ref() {
					*self.selection = op.transform_range(range);
				}
			}
		}

		for slot in self.refs.iter_mut().flatten() {
			match slot {
				Tracked::Point(point, affinity) => {
					*point = point.as_ref().and_then(|p| op.transform_point(p, *affinity));
				}
				Tracked::Path(path, affinity) => {
					*path = path.as_ref().and_then(|p| op.transform_path(p, *affinity));
				}
			}
		}

		self.operations.push(op);
		Ok(())
	}

	/// Moves a selection point across a node removal. A point inside the
	/// removed node moves to the nearest surviving text run.
	fn relocate(&self, op: &Operation, point: &Point, removed: &Path) -> Option<Point> {
		if let Some(moved) = op.transform_point(point, Affinity::Forward) {
			return Some(moved);
		}

		let texts = self.document.texts();
		let split = texts.iter().position(|(path, _)| path >= removed).unwrap_or(texts.len());
		let prev = split.checked_sub(1).and_then(|i| texts.get(i));
		let next = texts.get(split);

		let prefer_next = match (prev, next) {
			(Some((prev, _)), Some((next, _))) => {
				if next == removed {
					next.previous().is_none()
				} else {
					prev.common(removed).len() < next.common(removed).len()
				}
			}
			_ => false,
		};

		match (prev, next) {
			(Some((path, text)), _) if !prefer_next => Some(Point::new(path.clone(), text.len())),
			(_, Some((path, _))) => Some(Point::new(path.clone(), 0)),
			_ => None,
		}
	}

	/// Runs `f` as one unit: if it fails, everything it applied is undone.
	pub fn atomic<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
		let mark = self.operations.len();
		let selection = self.selection.clone();

		match f(self) {
			Ok(value) => Ok(value),
			Err(err) => {
				let undo: Vec<Operation> = self.operations.drain(mark..).rev().map(|op| op.invert()).collect();
				for op in &undo {
					if let Err(inner) = op.apply(self.document) {
						tracing::error!(op = %op, error = %inner, "rollback step failed");
					}
				}
				*self.selection = selection;
				tracing::debug!(error = %err, undone = undo.len(), "transform rolled back");
				Err(err)
			}
		}
	}

	pub(crate) fn point_ref(&mut self, point: Point, affinity: Affinity) -> PointRef {
		self.refs.push(Some(Tracked::Point(Some(point), affinity)));
		PointRef(self.refs.len() - 1)
	}

	pub(crate) fn path_ref(&mut self, path: Path, affinity: Affinity) -> PathRef {
		self.refs.push(Some(Tracked::Path(Some(path), affinity)));
		PathRef(self.refs.len() - 1)
	}

	/// Current position of a tracked point, without releasing it.
	pub(crate) fn point_of(&self, r: PointRef) -> Option<Point> {
		match self.refs.get(r.0) {
			Some(Some(Tracked::Point(point, _))) => point.clone(),
			_ => None,
		}
	}

	pub(crate) fn path_of(&self, r: PathRef) -> Option<Path> {
		match self.refs.get(r.0) {
			Some(Some(Tracked::Path(path, _))) => path.clone(),
			_ => None,
		}
	}

	/// Releases a tracked point and returns where it ended up.
	pub(crate) fn unref_point(&mut self, r: PointRef) -> Option<Point> {
		let point = self.point_of(r);
		self.release(r.0);
		point
	}

	pub(crate) fn unref_path(&mut self, r: PathRef) -> Option<Path> {
		let path = self.path_of(r);
		self.release(r.0);
		path
	}

	fn release(&mut self, index: usize) {
		if let Some(slot) = self.refs.get_mut(index) {
			*slot = None;
		}
		while matches!(self.refs.last(), Some(None)) {
			self.refs.pop();
		}
	}

	/// The location a transform defaults to: the selection.
	fn selection_location(&self) -> Option<Location> {
		self.selection.clone().map(Location::Range)
	}
}
