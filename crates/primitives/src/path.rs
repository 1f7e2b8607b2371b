use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

#[cfg(test)]
mod tests;

/// Address of a node: the child index taken at each level below the root.
///
/// The empty path addresses the document root. Lexicographic ordering of
/// paths is document order, with ancestors sorting before their descendants.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(SmallVec<[usize; 4]>);

impl Path {
	/// The root path.
	pub fn root() -> Self {
		Self(SmallVec::new())
	}

	pub fn new(indices: impl IntoIterator<Item = usize>) -> Self {
		Self(indices.into_iter().collect())
	}

	pub fn is_root(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn as_slice(&self) -> &[usize] {
		&self.0
	}

	/// Index of the addressed node within its parent.
	pub fn last(&self) -> Option<usize> {
		self.0.last().copied()
	}

	/// Returns the parent path, or `None` for the root.
	pub fn parent(&self) -> Option<Path> {
		if self.0.is_empty() {
			return None;
		}
		Some(Self(self.0[..self.0.len() - 1].into()))
	}

	/// Returns the path of the `index`-th child of this node.
	pub fn child(&self, index: usize) -> Path {
		let mut inner = self.0.clone();
		inner.push(index);
		Self(inner)
	}

	/// Returns the path of the next sibling.
	///
	/// # Panics
	///
	/// Panics on the root path, which has no siblings.
	pub fn next(&self) -> Path {
		let mut inner = self.0.clone();
		let last = inner.last_mut().expect("root path has no next sibling");
		*last += 1;
		Self(inner)
	}

	/// Returns the path of the previous sibling, if there is one.
	pub fn previous(&self) -> Option<Path> {
		let last = self.last()?;
		if last == 0 {
			return None;
		}
		let mut inner = self.0.clone();
		*inner.last_mut()? -= 1;
		Some(Self(inner))
	}

	/// Returns true if `self` is a strict ancestor of `other`.
	pub fn is_ancestor_of(&self, other: &Path) -> bool {
		self.0.len() < other.0.len() && other.0.starts_with(&self.0)
	}

	/// Returns true if `self` equals `other` or is one of its ancestors.
	pub fn contains(&self, other: &Path) -> bool {
		other.0.starts_with(&self.0)
	}

	pub fn is_sibling_of(&self, other: &Path) -> bool {
		!self.is_root() && self.0.len() == other.0.len() && self.parent() == other.parent() && self != other
	}

	/// Returns true if `self` ends before `other` starts at the level of `self`.
	///
	/// This is the condition under which a change at `self` shifts the index
	/// `other` carries at that level, e.g. `[1]` ends before `[2, 0]`.
	pub fn ends_before(&self, other: &Path) -> bool {
		let Some((&last, prefix)) = self.0.split_last() else {
			return false;
		};
		other.0.len() >= self.0.len() && other.0.starts_with(prefix) && last < other.0[prefix.len()]
	}

	/// Returns true if `self` comes strictly before `other` in document order
	/// and is not one of its ancestors.
	pub fn is_before(&self, other: &Path) -> bool {
		self < other && !self.is_ancestor_of(other)
	}

	/// Returns true if `self` comes strictly after `other` in document order
	/// and is not one of its descendants.
	pub fn is_after(&self, other: &Path) -> bool {
		self > other && !other.is_ancestor_of(self)
	}

	/// Returns the longest common ancestor path.
	pub fn common(&self, other: &Path) -> Path {
		Self(
			self.0
				.iter()
				.zip(other.0.iter())
				.take_while(|(a, b)| a == b)
				.map(|(a, _)| *a)
				.collect(),
		)
	}

	/// Returns the ancestors of this path from the root down, excluding the root.
	pub fn ancestors(&self) -> impl Iterator<Item = Path> + '_ {
		(1..self.0.len()).map(|len| Self(self.0[..len].into()))
	}

	/// Shifts the index at `level` by `delta`.
	///
	/// # Panics
	///
	/// Panics if `level` is out of bounds or the index would underflow.
	pub fn offset_at(&mut self, level: usize, delta: isize) {
		let slot = &mut self.0[level];
		*slot = slot.checked_add_signed(delta).expect("path index underflow");
	}

	/// Replaces the index at `level`.
	pub fn set_at(&mut self, level: usize, value: usize) {
		self.0[level] = value;
	}

	/// Index at `level`, if the path is that deep.
	pub fn get(&self, level: usize) -> Option<usize> {
		self.0.get(level).copied()
	}
}

impl From<&[usize]> for Path {
	fn from(indices: &[usize]) -> Self {
		Self(indices.into())
	}
}

impl<const N: usize> From<[usize; N]> for Path {
	fn from(indices: [usize; N]) -> Self {
		Self(indices.iter().copied().collect())
	}
}

impl fmt::Display for Path {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("[")?;
		for (i, index) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{index}")?;
		}
		f.write_str("]")
	}
}
