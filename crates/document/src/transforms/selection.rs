use quire_primitives::{Edge, EditError, Point, Range, Result, Unit};

use super::Transform;
use crate::operation::Operation;

/// Options for [`Transform::move_selection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOptions {
	pub distance: usize,
	pub unit: Unit,
	pub reverse: bool,
	/// Move only this edge. `None` moves both, so a cursor stays collapsed.
	pub edge: Option<Edge>,
}

impl Default for MoveOptions {
	fn default() -> Self {
		Self {
			distance: 1,
			unit: Unit::Character,
			reverse: false,
			edge: None,
		}
	}
}

impl MoveOptions {
	pub fn by(unit: Unit) -> Self {
		Self { unit, ..Self::default() }
	}

	pub fn reverse(mut self) -> Self {
		self.reverse = true;
		self
	}

	pub fn edge(mut self, edge: Edge) -> Self {
		self.edge = Some(edge);
		self
	}
}

impl Transform<'_> {
	/// Sets the selection without validation. Records nothing when unchanged.
	pub(crate) fn set_selection(&mut self, new: Option<Range>) -> Result<()> {
		if *self.selection == new {
			return Ok(());
		}
		let old = self.selection.clone();
		self.apply(Operation::SetSelection { old, new })
	}

	/// Selects `range`.
	pub fn select(&mut self, range: Range) -> Result<()> {
		if self.document.check_point(&range.anchor).is_err() || self.document.check_point(&range.focus).is_err() {
			return Err(EditError::invalid(range));
		}
		self.set_selection(Some(range))
	}

	pub fn deselect(&mut self) -> Result<()> {
		self.set_selection(None)
	}

	/// Collapses the selection onto one of its edges.
	pub fn collapse(&mut self, edge: Edge) -> Result<()> {
		let Some(range) = self.selection.as_ref() else {
			return Ok(());
		};
		let point = range.edge(edge).clone();
		self.set_selection(Some(Range::collapsed(point)))
	}

	/// Moves the selection by `distance` units. Points stop at the document
	/// boundaries.
	pub fn move_selection(&mut self, options: MoveOptions) -> Result<()> {
		let Some(range) = self.selection.clone() else {
			return Ok(());
		};
		let start_is_anchor = !range.is_backward();
		let (move_anchor, move_focus) = match options.edge {
			None => (true, true),
			Some(Edge::Anchor) => (true, false),
			Some(Edge::Focus) => (false, true),
			Some(Edge::Start) => (start_is_anchor, !start_is_anchor),
			Some(Edge::End) => (!start_is_anchor, start_is_anchor),
		};

		let mut next = range.clone();
		if move_anchor {
			next.anchor = self.step(next.anchor, options);
		}
		if move_focus {
			next.focus = self.step(next.focus, options);
		}
		tracing::trace!(from = %range, to = %next, "move selection");
		self.set_selection(Some(next))
	}

	fn step(&self, mut point: Point, options: MoveOptions) -> Point {
		for _ in 0..options.distance {
			let moved = if options.reverse {
				self.document.before(&point, options.unit, self.schema)
			} else {
				self.document.after(&point, options.unit, self.schema)
			};
			match moved {
				Some(moved) => point = moved,
				None => break,
			}
		}
		point
	}
}
