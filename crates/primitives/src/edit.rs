//! Edit operation errors.

use crate::path::Path;
use crate::range::Location;

/// Errors returned by document reads and transforms.
///
/// All variants are recoverable: a failed transform leaves the document and
/// selection exactly as they were before the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
	/// A path, point or range does not resolve against the current tree.
	#[error("invalid location: {0}")]
	InvalidLocation(Location),

	/// The operation would break a structural invariant of the tree.
	#[error("schema violation at {path}: {reason}")]
	SchemaViolation {
		/// Node at which the violation would occur.
		path: Path,
		/// What would have been violated.
		reason: &'static str,
	},

	/// A read addressed a node that does not exist.
	#[error("no node at {0}")]
	NotFound(Path),
}

impl EditError {
	pub fn invalid(location: impl Into<Location>) -> Self {
		Self::InvalidLocation(location.into())
	}

	pub fn schema(path: Path, reason: &'static str) -> Self {
		Self::SchemaViolation { path, reason }
	}
}

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, EditError>;
