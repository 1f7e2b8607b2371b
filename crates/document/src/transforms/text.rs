use quire_primitives::{Affinity, EditError, Location, Path, Point, Range, Result, Unit};
use serde_json::Value;

use super::Transform;
use crate::node::{Element, Marks, Node, Props, Text};
use crate::operation::{Operation, text_span};
use crate::query::{Mode, matching_paths};

/// Options for [`Transform::delete`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteOptions {
	/// Extent removed around a collapsed location.
	pub unit: Unit,
	/// Remove before the cursor instead of after it.
	pub reverse: bool,
}

impl DeleteOptions {
	pub fn backward(unit: Unit) -> Self {
		Self { unit, reverse: true }
	}

	pub fn forward(unit: Unit) -> Self {
		Self { unit, reverse: false }
	}
}

impl Transform<'_> {
	/// Inserts `text` at `at`, or at the selection.
	///
	/// An expanded target is deleted first. The text takes the marks of the
	/// run it lands in.
	pub fn insert_text(&mut self, text: &str, at: Option<Location>) -> Result<()> {
		self.atomic(|tx| tx.insert_text_inner(text, None, at))
	}

	/// Inserts `text` carrying exactly `marks`.
	///
	/// When `marks` differ from the target run's, the run is split and a new
	/// run is placed between the halves. Neighbouring runs are never merged.
	pub fn insert_marked_text(&mut self, text: &str, marks: &Marks, at: Option<Location>) -> Result<()> {
		self.atomic(|tx| tx.insert_text_inner(text, Some(marks), at))
	}

	fn insert_text_inner(&mut self, text: &str, marks: Option<&Marks>, at: Option<Location>) -> Result<()> {
		let uses_selection = at.is_none();
		let Some(at) = at.or_else(|| self.selection_location()) else {
			tracing::trace!("insert_text without a location");
			return Ok(());
		};

		let range = self.document.range(&at)?;
		let point = if range.is_expanded() {
			self.delete_range(&range)?
		} else {
			range.anchor
		};

		if let Some(void) = self.document.void_ancestor(&point.path, self.schema) {
			return Err(EditError::schema(void, "cannot insert text into a void element"));
		}
		if text.is_empty() {
			return Ok(());
		}

		let run = self.document.text(&point.path)?;
		let len = text.chars().count();
		let differs = marks.is_some_and(|m| *m != run.marks);

		let end = match marks {
			Some(marks) if differs && run.is_empty() => {
				let path = point.path.clone();
				let patch = replace_marks(&run.marks, marks);
				let properties = self.document.node(&path)?.snapshot(&patch);
				self.apply(Operation::SetNode {
					path: path.clone(),
					properties,
					new_properties: patch,
				})?;
				self.insert_string(&path, 0, text)?;
				Point::new(path, len)
			}
			Some(marks) if differs => {
				let run_len = run.len();
				let target = if point.offset == 0 {
					point.path.clone()
				} else if point.offset == run_len {
					point.path.next()
				} else {
					let properties = self.document.node(&point.path)?.split_props();
					self.apply(Operation::SplitNode {
						path: point.path.clone(),
						position: point.offset,
						properties,
					})?;
					point.path.next()
				};
				let node = Node::Text(Text::new(text).with_marks(marks.clone()));
				self.apply(Operation::InsertNode {
					path: target.clone(),
					node,
				})?;
				Point::new(target, len)
			}
			_ => {
				self.insert_string(&point.path, point.offset, text)?;
				Point::new(point.path.clone(), point.offset + len)
			}
		};

		if uses_selection {
			self.set_selection(Some(Range::collapsed(end)))?;
		}
		Ok(())
	}

	fn insert_string(&mut self, path: &Path, offset: usize, text: &str) -> Result<()> {
		self.apply(Operation::InsertText {
			path: path.clone(),
			offset,
			text: text.to_string(),
		})
	}

	/// Removes content at `at`, or at the selection.
	///
	/// A collapsed location removes one `unit` after it, or before it when
	/// `reverse` is set. A path removes that node.
	pub fn delete(&mut self, at: Option<Location>, options: DeleteOptions) -> Result<()> {
		self.atomic(|tx| {
			let uses_selection = at.is_none();
			let Some(at) = at.or_else(|| tx.selection_location()) else {
				return Ok(());
			};
			tx.document.check_location(&at)?;

			let range = match at {
				Location::Path(path) => return tx.remove_checked(&path),
				Location::Point(point) => Range::collapsed(point),
				Location::Range(range) => range,
			};

			let range = if range.is_collapsed() {
				let point = range.anchor;
				if let Some(void) = tx.document.void_ancestor(&point.path, tx.schema) {
					return tx.remove_node_at(&void);
				}
				let other = if options.reverse {
					tx.document.before(&point, options.unit, tx.schema)
				} else {
					tx.document.after(&point, options.unit, tx.schema)
				};
				let Some(other) = other else {
					return Ok(());
				};
				Range::new(point, other)
			} else {
				range
			};

			let point = tx.delete_range(&range)?;
			if uses_selection {
				tx.set_selection(Some(Range::collapsed(point)))?;
			}
			Ok(())
		})
	}

	/// Removes one node, keeping the root populated.
	pub(crate) fn remove_node_at(&mut self, path: &Path) -> Result<()> {
		let node = self.document.node(path)?.clone();
		self.apply(Operation::RemoveNode { path: path.clone(), node })?;
		self.ensure_root_block()
	}

	/// Deletes the content between the edges of `range`; returns the point
	/// where the edges meet afterwards.
	pub(crate) fn delete_range(&mut self, range: &Range) -> Result<Point> {
		let (start, end) = range.edges();
		let (mut start, mut end) = (start.clone(), end.clone());
		let schema = self.schema;

		// Edges inside an inline void move out of it, within the same block.
		if let Some(void) = self.document.void_ancestor(&start.path, schema) {
			let block = self.document.block_of(&void, schema);
			if let Some(before) = self.document.before(&start, Unit::Character, schema)
				&& block.as_ref().is_some_and(|b| b.is_ancestor_of(&before.path))
			{
				start = before;
			}
		}
		if let Some(void) = self.document.void_ancestor(&end.path, schema) {
			let block = self.document.block_of(&void, schema);
			if let Some(after) = self.document.after(&end, Unit::Character, schema)
				&& block.as_ref().is_some_and(|b| b.is_ancestor_of(&after.path))
			{
				end = after;
			}
		}

		let start_void = self.document.void_ancestor(&start.path, schema);
		let end_void = self.document.void_ancestor(&end.path, schema);
		let start_block = self.document.block_of(&start.path, schema);
		let end_block = self.document.block_of(&end.path, schema);
		let single_text = start.path == end.path;
		let across_blocks = start_block != end_block;

		// Highest nodes strictly between the edges, plus voids an edge touches.
		let span = Range::new(start.clone(), end.clone());
		let matches = matching_paths(self.document, schema, span, Mode::Highest, false, |node, path| {
			schema.is_void(node) || (!path.contains(&start.path) && !path.contains(&end.path))
		})?;
		let path_refs: Vec<_> = matches
			.into_iter()
			.map(|path| self.path_ref(path, Affinity::Forward))
			.collect();

		let start_ref = self.point_ref(start.clone(), Affinity::Backward);
		let end_ref = self.point_ref(end.clone(), Affinity::Forward);
		let start_block_ref = start_block.map(|b| self.path_ref(b, Affinity::Backward));
		let end_block_ref = end_block.map(|b| self.path_ref(b, Affinity::Forward));

		if !single_text && start_void.is_none() {
			let len = self.document.text(&start.path)?.len();
			if start.offset < len {
				self.remove_string(&start.path, start.offset, len - start.offset)?;
			}
		}

		for r in path_refs.into_iter().rev() {
			if let Some(path) = self.unref_path(r) {
				let node = self.document.node(&path)?.clone();
				self.apply(Operation::RemoveNode { path, node })?;
			}
		}

		if end_void.is_none()
			&& let Some(point) = self.point_of(end_ref)
		{
			let from = if single_text { start.offset } else { 0 };
			if from < point.offset {
				self.remove_string(&point.path, from, point.offset - from)?;
			}
		}

		let start_block = start_block_ref.and_then(|r| self.unref_path(r));
		let end_block = end_block_ref.and_then(|r| self.unref_path(r));

		if !single_text
			&& across_blocks
			&& let (Some(start_block), Some(end_block)) = (&start_block, &end_block)
			&& self.point_of(start_ref).is_some()
			&& self.point_of(end_ref).is_some()
		{
			self.merge_blocks(start_block, end_block)?;
		}

		let point = self.unref_point(end_ref).or_else(|| self.unref_point(start_ref));
		self.unref_point(start_ref);

		if let Some(block) = &start_block {
			self.normalize_block(block)?;
		}
		self.ensure_root_block()?;

		match point {
			Some(point) if self.document.check_point(&point).is_ok() => Ok(point),
			_ => match self.selection.as_ref() {
				Some(range) => Ok(range.start().clone()),
				None => self.document.start(&Path::root()),
			},
		}
	}

	fn remove_string(&mut self, path: &Path, offset: usize, len: usize) -> Result<()> {
		let text = text_span(self.document, path, offset, len)?;
		self.apply(Operation::RemoveText {
			path: path.clone(),
			offset,
			text,
		})
	}

	/// Merges `end` into `start` when they are adjacent siblings.
	fn merge_blocks(&mut self, start: &Path, end: &Path) -> Result<()> {
		if start.is_root() || start.next() != *end {
			tracing::trace!(%start, %end, "blocks not adjacent, left unmerged");
			return Ok(());
		}
		let start_node = self.document.node(start)?;
		let end_node = self.document.node(end)?;
		if self.schema.is_void(start_node) || self.schema.is_void(end_node) {
			return Ok(());
		}
		let position = start_node.children().len();
		let properties = end_node.split_props();
		self.apply(Operation::MergeNode {
			path: end.clone(),
			position,
			properties,
		})
	}

	/// Restores the inline-level shape of a block: never empty, and every
	/// inline element flanked by text runs.
	pub(crate) fn normalize_block(&mut self, block: &Path) -> Result<()> {
		let Ok(node) = self.document.node(block) else {
			return Ok(());
		};
		if self.schema.is_void(node) || !self.schema.is_block(node) {
			return Ok(());
		}
		if node.children().is_empty() {
			return self.insert_empty_text(block.child(0));
		}
		if node.children().iter().any(|c| self.schema.is_block(c)) {
			return Ok(());
		}

		let mut i = 0;
		loop {
			let children = self.document.children_at(block)?;
			let Some(child) = children.get(i) else {
				break;
			};
			if self.schema.is_inline(child) {
				let text_before = i > 0 && children[i - 1].is_text();
				let text_after = children.get(i + 1).is_some_and(Node::is_text);
				if !text_before {
					self.insert_empty_text(block.child(i))?;
					i += 1;
				}
				if !text_after {
					self.insert_empty_text(block.child(i + 1))?;
				}
			}
			i += 1;
		}
		Ok(())
	}

	fn insert_empty_text(&mut self, path: Path) -> Result<()> {
		self.apply(Operation::InsertNode {
			path,
			node: Node::Text(Text::empty()),
		})
	}

	/// Keeps at least one block in the document.
	pub(crate) fn ensure_root_block(&mut self) -> Result<()> {
		if !self.document.children().is_empty() {
			return Ok(());
		}
		self.apply(Operation::InsertNode {
			path: Path::new([0]),
			node: Element::paragraph("").into(),
		})
	}
}

/// A patch turning `current` marks into exactly `target`.
fn replace_marks(current: &Marks, target: &Marks) -> Props {
	let mut patch = Props::default();
	for key in current.keys().filter(|k| !target.contains_key(*k)) {
		patch.attrs.insert(key.clone(), Value::Null);
	}
	for (key, value) in target {
		patch.attrs.insert(key.clone(), value.clone());
	}
	patch
}
