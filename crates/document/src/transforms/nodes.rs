use quire_primitives::{Affinity, EditError, Location, Path, Point, Range, Result, Unit};

use super::Transform;
use crate::document::validate_node;
use crate::node::{Element, Node, Props};
use crate::operation::Operation;
use crate::query::{Mode, matching_paths};

/// Options for [`Transform::set_nodes`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetNodesOptions {
	/// Where to apply. `None` uses the selection, or the whole document
	/// when there is none.
	pub at: Option<Location>,
	pub mode: Mode,
	/// Split text runs at the range edges so the change covers exactly the range.
	pub split: bool,
	/// Also match nodes inside void elements.
	pub voids: bool,
}

impl SetNodesOptions {
	pub fn at(at: impl Into<Location>) -> Self {
		Self {
			at: Some(at.into()),
			..Self::default()
		}
	}

	pub fn split(mut self) -> Self {
		self.split = true;
		self
	}

	pub fn mode(mut self, mode: Mode) -> Self {
		self.mode = mode;
		self
	}
}

impl Transform<'_> {
	/// Inserts `nodes` at `at`, or at the selection, or at the end of the
	/// document.
	///
	/// At a point, text runs and inline elements split the run they land in,
	/// while blocks split the enclosing block (or go beside it at its edges).
	/// When no location was given, the cursor ends up at the end of the last
	/// inserted node.
	pub fn insert_nodes(&mut self, nodes: Vec<Node>, at: Option<Location>) -> Result<()> {
		self.atomic(|tx| tx.insert_nodes_inner(nodes, at))
	}

	fn insert_nodes_inner(&mut self, nodes: Vec<Node>, at: Option<Location>) -> Result<()> {
		let Some(first) = nodes.first() else {
			return Ok(());
		};
		let inline_like = self.schema.is_inline_level(first);
		let select = at.is_none();
		let at = match at.or_else(|| self.selection_location()) {
			Some(at) => at,
			None => Location::Point(self.document.end(&Path::root())?),
		};
		if !matches!(at, Location::Path(_)) {
			self.document.check_location(&at)?;
		}

		let target = match at {
			Location::Path(path) => path,
			Location::Point(point) => self.insertion_path(point, inline_like)?,
			Location::Range(range) => {
				let point = if range.is_expanded() {
					self.delete_range(&range)?
				} else {
					range.anchor
				};
				self.insertion_path(point, inline_like)?
			}
		};

		let (Some(parent), Some(mut index)) = (target.parent(), target.last()) else {
			return Err(EditError::invalid(target));
		};
		let siblings = self
			.document
			.children_at(&parent)
			.map_err(|_| EditError::invalid(target.clone()))?;
		if index > siblings.len() {
			return Err(EditError::invalid(target));
		}
		if let Some(void) = self.document.void_ancestor(&parent, self.schema) {
			return Err(EditError::schema(void, "cannot insert into a void element"));
		}
		let takes_blocks = parent.is_root() || siblings.iter().any(|c| self.schema.is_block(c));

		let mut last = None;
		for node in nodes {
			let path = parent.child(index);
			validate_node(&node, &path, self.schema)?;
			match (takes_blocks, self.schema.is_block(&node)) {
				(true, false) => return Err(EditError::schema(path, "only blocks can be placed among blocks")),
				(false, true) => return Err(EditError::schema(path, "blocks cannot be placed in inline content")),
				_ => {}
			}
			self.apply(Operation::InsertNode {
				path: path.clone(),
				node,
			})?;
			index += 1;
			last = Some(path);
		}

		let Some(last) = last else {
			return Ok(());
		};
		let last = self.path_ref(last, Affinity::Forward);
		if !takes_blocks && let Some(block) = self.document.block_of(&parent.child(0), self.schema) {
			self.normalize_block(&block)?;
		}
		let last = self.unref_path(last);

		if select && let Some(last) = last {
			let end = self.document.end(&last)?;
			self.set_selection(Some(Range::collapsed(end)))?;
		}
		Ok(())
	}

	/// Resolves the path a node inserted at `point` goes to, splitting as needed.
	fn insertion_path(&mut self, point: Point, inline_like: bool) -> Result<Path> {
		let schema = self.schema;
		if let Some(void) = self.document.void_ancestor(&point.path, schema) {
			let node = self.document.node(&void)?;
			if inline_like && !schema.is_inline(node) {
				return Err(EditError::schema(void, "cannot insert into a void element"));
			}
			if !inline_like && schema.is_inline(node) {
				return self.block_insertion_path(&void);
			}
			return Ok(void.next());
		}

		if inline_like {
			let len = self.document.text(&point.path)?.len();
			if point.offset == 0 {
				return Ok(point.path);
			}
			if point.offset < len {
				self.split_text_at(&point)?;
			}
			return Ok(point.path.next());
		}

		let block = self
			.document
			.block_of(&point.path, schema)
			.ok_or_else(|| EditError::invalid(point.clone()))?;
		if self.document.is_end(&point, &block) {
			return Ok(block.next());
		}
		if self.document.is_start(&point, &block) {
			return Ok(block);
		}
		self.split_point(&point, &block, false)?;
		Ok(block.next())
	}

	/// A block inserted from inside an inline void goes after the void's block.
	fn block_insertion_path(&mut self, void: &Path) -> Result<Path> {
		let block = self
			.document
			.block_of(void, self.schema)
			.ok_or_else(|| EditError::invalid(void.clone()))?;
		Ok(block.next())
	}

	/// Removes the node at `at`.
	///
	/// Refuses to leave an element childless, so the placeholder text of a
	/// void cannot be removed on its own, and the last block stays put.
	pub fn remove_nodes(&mut self, at: Path) -> Result<()> {
		self.atomic(|tx| tx.remove_checked(&at))
	}

	pub(crate) fn remove_checked(&mut self, path: &Path) -> Result<()> {
		let parent = path.parent().ok_or_else(|| EditError::invalid(path.clone()))?;
		let node = self.document.node(path)?.clone();
		if self.document.children_at(&parent)?.len() == 1 {
			let reason = if parent.is_root() {
				"document must contain at least one block"
			} else {
				"cannot remove the only child of an element"
			};
			return Err(EditError::schema(parent, reason));
		}
		self.apply(Operation::RemoveNode {
			path: path.clone(),
			node,
		})?;
		if let Some(block) = self.document.block_of(&parent, self.schema) {
			self.normalize_block(&block)?;
		}
		Ok(())
	}

	/// Merges `props` into every node in range that `matcher` accepts.
	///
	/// Without `at` the range is the selection, or the whole document when
	/// nothing is selected.
	///
	/// With `split`, text runs straddling a range edge are split first so
	/// marks apply to the exact substring. A collapsed range with `split`
	/// only affects an empty run.
	pub fn set_nodes(
		&mut self,
		props: &Props,
		matcher: impl Fn(&Node, &Path) -> bool,
		options: SetNodesOptions,
	) -> Result<()> {
		self.atomic(|tx| {
			let (at, uses_selection) = match options.at.clone() {
				Some(at) => (at, false),
				None => match tx.selection_location() {
					Some(at) => (at, true),
					None if tx.document.children().is_empty() => return Ok(()),
					None => {
						let root = Path::root();
						let whole = Range::new(tx.document.start(&root)?, tx.document.end(&root)?);
						(Location::Range(whole), false)
					}
				},
			};
			let mut range = tx.document.range(&at)?;

			if options.split && matches!(at, Location::Range(_)) {
				if range.is_collapsed() {
					if !tx.document.text(&range.anchor.path)?.is_empty() {
						return Ok(());
					}
				} else {
					let backward = range.is_backward();
					let (start, end) = range.edges();
					let start_ref = tx.point_ref(start.clone(), Affinity::Forward);
					let end_ref = tx.point_ref(end.clone(), Affinity::Backward);

					tx.split_text_at(end)?;
					if let Some(start) = tx.point_of(start_ref) {
						tx.split_text_at(&start)?;
					}

					let start = tx.unref_point(start_ref);
					let end = tx.unref_point(end_ref);
					let (Some(start), Some(end)) = (start, end) else {
						return Err(EditError::invalid(range));
					};
					range = if backward {
						Range::new(end, start)
					} else {
						Range::new(start, end)
					};
					if uses_selection {
						tx.set_selection(Some(range.clone()))?;
					}
				}
			}

			let paths = matching_paths(tx.document, tx.schema, range, options.mode, options.voids, &matcher)?;
			for path in paths {
				let node = tx.document.node(&path)?;
				if !node.differs(props) {
					continue;
				}
				let properties = node.snapshot(props);
				tx.apply(Operation::SetNode {
					path,
					properties,
					new_properties: props.clone(),
				})?;
			}
			Ok(())
		})
	}

	/// Splits the block at `at`, or at the selection, in two.
	///
	/// With `always`, a point at a block edge still yields an empty sibling.
	/// Inside a block void, an empty paragraph is added after it instead.
	pub fn split_nodes(&mut self, at: Option<Location>, always: bool) -> Result<()> {
		self.atomic(|tx| {
			let uses_selection = at.is_none();
			let Some(at) = at.or_else(|| tx.selection_location()) else {
				return Ok(());
			};
			let range = tx.document.range(&at)?;
			let mut point = if range.is_expanded() {
				tx.delete_range(&range)?
			} else {
				range.anchor
			};

			if let Some(void) = tx.document.void_ancestor(&point.path, tx.schema) {
				if tx.schema.is_inline(tx.document.node(&void)?) {
					point = tx
						.document
						.after(&point, Unit::Character, tx.schema)
						.ok_or_else(|| EditError::invalid(point.clone()))?;
				} else {
					let path = void.next();
					tx.apply(Operation::InsertNode {
						path: path.clone(),
						node: Element::paragraph("").into(),
					})?;
					if uses_selection {
						let start = tx.document.start(&path)?;
						tx.set_selection(Some(Range::collapsed(start)))?;
					}
					return Ok(());
				}
			}

			let block = tx
				.document
				.block_of(&point.path, tx.schema)
				.ok_or_else(|| EditError::invalid(point.clone()))?;
			if !tx.split_point(&point, &block, always)? {
				return Ok(());
			}
			let next = block.next();
			tx.normalize_block(&block)?;
			tx.normalize_block(&next)?;
			if uses_selection {
				let start = tx.document.start(&next)?;
				tx.set_selection(Some(Range::collapsed(start)))?;
			}
			Ok(())
		})
	}

	/// Splits the run at `point` unless the point sits at one of its edges.
	pub(crate) fn split_text_at(&mut self, point: &Point) -> Result<()> {
		let text = self.document.text(&point.path)?;
		if point.offset == 0 || point.offset >= text.len() {
			return Ok(());
		}
		let properties = self.document.node(&point.path)?.split_props();
		self.apply(Operation::SplitNode {
			path: point.path.clone(),
			position: point.offset,
			properties,
		})
	}

	/// Splits every node from the run at `point` up to `target`.
	///
	/// Without `always`, a level whose split position is one of its edges is
	/// left whole. Returns whether `target` itself was split.
	pub(crate) fn split_point(&mut self, point: &Point, target: &Path, always: bool) -> Result<bool> {
		if !target.contains(&point.path) || target.is_root() {
			return Err(EditError::invalid(point.clone()));
		}
		let mut path = point.path.clone();
		let mut position = point.offset;
		loop {
			let node = self.document.node(&path)?;
			let len = match node {
				Node::Text(text) => text.len(),
				Node::Element(element) => element.children.len(),
			};
			let index = path.last().ok_or_else(|| EditError::invalid(path.clone()))?;
			let at_edge = position == 0 || position >= len;
			let split = always || !at_edge;
			if split {
				let properties = node.split_props();
				self.apply(Operation::SplitNode {
					path: path.clone(),
					position,
					properties,
				})?;
			}
			if path == *target {
				return Ok(split);
			}
			position = if split || position != 0 { index + 1 } else { index };
			path = path.parent().ok_or_else(|| EditError::invalid(point.clone()))?;
		}
	}
}
