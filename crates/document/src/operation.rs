//! Primitive, invertible document mutations.
//!
//! Every transform decomposes into operations. Each operation validates its
//! target before mutating, can be inverted, and knows how paths and points
//! move across it.

use std::fmt;

use quire_primitives::{Affinity, CharIdx, EditError, Path, Point, Range, Result};

use crate::document::{Document, byte_offset, char_slice};
use crate::node::{Element, Node, Props, Text};


#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
	InsertNode {
		path: Path,
		node: Node,
	},
	RemoveNode {
		path: Path,
		node: Node,
	},
	InsertText {
		path: Path,
		offset: CharIdx,
		text: String,
	},
	RemoveText {
		path: Path,
		offset: CharIdx,
		text: String,
	},
	/// Splits the node at `path` at `position` (a char offset for text runs,
	/// a child index for elements). The new right half gets `properties`.
	SplitNode {
		path: Path,
		position: usize,
		properties: Props,
	},
	/// Merges the node at `path` into its previous sibling, whose length
	/// before the merge was `position`.
	MergeNode {
		path: Path,
		position: usize,
		properties: Props,
	},
	SetNode {
		path: Path,
		properties: Props,
		new_properties: Props,
	},
	SetSelection {
		old: Option<Range>,
		new: Option<Range>,
	},
}

fn char_len(s: &str) -> usize {
	s.chars().count()
}

impl Operation {
	/// Short name used in logs.
	pub fn name(&self) -> &'static str {
		match self {
			Operation::InsertNode { .. } => "insert_node",
			Operation::RemoveNode { .. } => "remove_node",
			Operation::InsertText { .. } => "insert_text",
			Operation::RemoveText { .. } => "remove_text",
			Operation::SplitNode { .. } => "split_node",
			Operation::MergeNode { .. } => "merge_node",
			Operation::SetNode { .. } => "set_node",
			Operation::SetSelection { .. } => "set_selection",
		}
	}

	/// Path of the node the operation targets, if any.
	pub fn path(&self) -> Option<&Path> {
		match self {
			Operation::InsertNode { path, .. }
			| Operation::RemoveNode { path, .. }
			| Operation::InsertText { path, .. }
			| Operation::RemoveText { path, .. }
			| Operation::SplitNode { path, .. }
			| Operation::MergeNode { path, .. }
			| Operation::SetNode { path, .. } => Some(path),
			Operation::SetSelection { .. } => None,
		}
	}

	/// Returns true if the operation changes the tree rather than the selection.
	pub fn is_content_change(&self) -> bool {
		!matches!(self, Operation::SetSelection { .. })
	}

	/// Returns the operation that undoes this one.
	pub fn invert(&self) -> Operation {
		match self.clone() {
			Operation::InsertNode { path, node } => Operation::RemoveNode { path, node },
			Operation::RemoveNode { path, node } => Operation::InsertNode { path, node },
			Operation::InsertText { path, offset, text } => Operation::RemoveText { path, offset, text },
			Operation::RemoveText { path, offset, text } => Operation::InsertText { path, offset, text },
			Operation::SplitNode {
				path,
				position,
				properties,
			} => Operation::MergeNode {
				path: path.next(),
				position,
				properties,
			},
			Operation::MergeNode {
				path,
				position,
				properties,
			} => Operation::SplitNode {
				// A merge target always has a previous sibling.
				path: path.previous().unwrap_or_else(|| path.clone()),
				position,
				properties,
			},
			Operation::SetNode {
				path,
				properties,
				new_properties,
			} => Operation::SetNode {
				path,
				properties: new_properties,
				new_properties: properties,
			},
			Operation::SetSelection { old, new } => Operation::SetSelection { old: new, new: old },
		}
	}

	/// Applies the operation to `document`.
	///
	/// Fails without mutating when the target does not resolve.
	/// [`Operation::SetSelection`] leaves the tree untouched.
	pub fn apply(&self, document: &mut Document) -> Result<()> {
		match self {
			Operation::InsertNode { path, node } => {
				let (parent, index) = split_path(path)?;
				let children = document
					.children_at_mut(&parent)
					.map_err(|_| EditError::invalid(path.clone()))?;
				if index > children.len() {
					return Err(EditError::invalid(path.clone()));
				}
				children.insert(index, node.clone());
			}
			Operation::RemoveNode { path, .. } => {
				let (parent, index) = split_path(path)?;
				let children = document.children_at_mut(&parent)?;
				if index >= children.len() {
					return Err(EditError::NotFound(path.clone()));
				}
				children.remove(index);
			}
			Operation::InsertText { path, offset, text } => {
				let run = document.text_mut(path)?;
				if *offset > run.len() {
					return Err(EditError::invalid(Point::new(path.clone(), *offset)));
				}
				let at = byte_offset(&run.text, *offset);
				run.text.insert_str(at, text);
			}
			Operation::RemoveText { path, offset, text } => {
				let run = document.text_mut(path)?;
				let end = offset + char_len(text);
				if end > run.len() {
					return Err(EditError::invalid(Point::new(path.clone(), end)));
				}
				let (from, to) = (byte_offset(&run.text, *offset), byte_offset(&run.text, end));
				run.text.replace_range(from..to, "");
			}
			Operation::SplitNode {
				path,
				position,
				properties,
			} => {
				let (parent, index) = split_path(path)?;
				let node = document.node_mut(path)?;
				let right = match node {
					Node::Text(text) => {
						if *position > text.len() {
							return Err(EditError::invalid(Point::new(path.clone(), *position)));
						}
						let tail = text.text.split_off(byte_offset(&text.text, *position));
						Node::Text(Text::new(tail).with_marks(properties.attrs.clone()))
					}
					Node::Element(element) => {
						if *position > element.children.len() {
							return Err(EditError::invalid(path.clone()));
						}
						let tail = element.children.split_off(*position);
						let mut right = Element::new(properties.kind.unwrap_or(element.kind), tail);
						right.attrs = properties.attrs.clone();
						Node::Element(right)
					}
				};
				document.children_at_mut(&parent)?.insert(index + 1, right);
			}
			Operation::MergeNode { path, .. } => {
				let (parent, index) = split_path(path)?;
				if index == 0 {
					return Err(EditError::invalid(path.clone()));
				}
				let children = document.children_at_mut(&parent)?;
				if index >= children.len() {
					return Err(EditError::NotFound(path.clone()));
				}
				match (&children[index - 1], &children[index]) {
					(Node::Text(_), Node::Text(_)) | (Node::Element(_), Node::Element(_)) => {}
					_ => return Err(EditError::invalid(path.clone())),
				}
				let node = children.remove(index);
				match (&mut children[index - 1], node) {
					(Node::Text(prev), Node::Text(text)) => prev.text.push_str(&text.text),
					(Node::Element(prev), Node::Element(element)) => prev.children.extend(element.children),
					// Operand kinds were checked above.
					_ => {}
				}
			}
			Operation::SetNode { path, new_properties, .. } => {
				document.node_mut(path)?.apply_props(new_properties);
			}
			Operation::SetSelection { .. } => {}
		}
		Ok(())
	}

	/// Moves `path` across this operation. `None` when the node was removed.
	pub fn transform_path(&self, path: &Path, affinity: Affinity) -> Option<Path> {
		let mut p = path.clone();
		match self {
			Operation::InsertNode { path: op, .. } => {
				if op == &p || op.ends_before(&p) || op.is_ancestor_of(&p) {
					p.offset_at(op.len() - 1, 1);
				}
			}
			Operation::RemoveNode { path: op, .. } => {
				if op.contains(&p) {
					return None;
				}
				if op.ends_before(&p) {
					p.offset_at(op.len() - 1, -1);
				}
			}
			Operation::MergeNode { path: op, position, .. } => {
				if op == &p || op.ends_before(&p) {
					p.offset_at(op.len() - 1, -1);
				} else if op.is_ancestor_of(&p) {
					p.offset_at(op.len() - 1, -1);
					p.offset_at(op.len(), *position as isize);
				}
			}
			Operation::SplitNode { path: op, position, .. } => {
				if op == &p {
					if affinity == Affinity::Forward {
						p.offset_at(p.len() - 1, 1);
					}
				} else if op.ends_before(&p) {
					p.offset_at(op.len() - 1, 1);
				} else if op.is_ancestor_of(&p) && p.get(op.len()).is_some_and(|i| i >= *position) {
					p.offset_at(op.len() - 1, 1);
					p.offset_at(op.len(), -(*position as isize));
				}
			}
			Operation::InsertText { .. }
			| Operation::RemoveText { .. }
			| Operation::SetNode { .. }
			| Operation::SetSelection { .. } => {}
		}
		Some(p)
	}

	/// Moves `point` across this operation. `None` when its text run was removed.
	pub fn transform_point(&self, point: &Point, affinity: Affinity) -> Option<Point> {
		let mut out = point.clone();
		match self {
			Operation::InsertText { path, offset, text } if *path == point.path => {
				if *offset < point.offset || (*offset == point.offset && affinity == Affinity::Forward) {
					out.offset += char_len(text);
				}
			}
			Operation::RemoveText { path, offset, text } if *path == point.path => {
				if *offset <= point.offset {
					out.offset -= (point.offset - offset).min(char_len(text));
				}
			}
			Operation::MergeNode { path, position, .. } if *path == point.path => {
				out.offset += position;
				out.path = self.transform_path(&point.path, affinity)?;
			}
			Operation::SplitNode { path, position, .. } if *path == point.path => {
				if *position < point.offset || (*position == point.offset && affinity == Affinity::Forward) {
					out.offset -= position;
					out.path = self.transform_path(&point.path, Affinity::Forward)?;
				}
			}
			_ => out.path = self.transform_path(&point.path, affinity)?,
		}
		Some(out)
	}

	/// Moves `range` across this operation with inward affinity: an expanded
	/// range does not grow to cover content inserted at its edges.
	pub fn transform_range(&self, range: &Range) -> Option<Range> {
		let (anchor, focus) = if range.is_collapsed() {
			(Affinity::Forward, Affinity::Forward)
		} else if range.is_backward() {
			(Affinity::Backward, Affinity::Forward)
		} else {
			(Affinity::Forward, Affinity::Backward)
		};
		Some(Range::new(
			self.transform_point(&range.anchor, anchor)?,
			self.transform_point(&range.focus, focus)?,
		))
	}
}

fn split_path(path: &Path) -> Result<(Path, usize)> {
	match (path.parent(), path.last()) {
		(Some(parent), Some(index)) => Ok((parent, index)),
		_ => Err(EditError::invalid(path.clone())),
	}
}

impl fmt::Display for Operation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Operation::InsertText { path, offset, text } | Operation::RemoveText { path, offset, text } => {
				write!(f, "{} {path}:{offset} {text:?}", self.name())
			}
			Operation::SetSelection { new: Some(range), .. } => write!(f, "{} {range}", self.name()),
			Operation::SetSelection { new: None, .. } => write!(f, "{} none", self.name()),
			Operation::InsertNode { path, node } | Operation::RemoveNode { path, node } => {
				let label = node.kind().map_or("text", |k| k.name());
				write!(f, "{} {path} {label}", self.name())
			}
			Operation::SplitNode { path, position, .. } | Operation::MergeNode { path, position, .. } => {
				write!(f, "{} {path} @{position}", self.name())
			}
			Operation::SetNode { path, .. } => write!(f, "{} {path}", self.name()),
		}
	}
}

/// Returns the chars `offset..offset + len` of the run at `path`.
pub(crate) fn text_span(document: &Document, path: &Path, offset: CharIdx, len: usize) -> Result<String> {
	let text = &document.text(path)?.text;
	Ok(char_slice(text, offset, offset + len).to_string())
}
