//! Core types for rich-text editing: paths, points, ranges, movement and keys.

/// Edit errors shared by every layer of the document core.
pub mod edit;
/// Grapheme cluster boundary detection.
pub mod graphemes;
/// Key event types.
pub mod key;
/// Character classes and word boundaries.
pub mod movement;
/// Tree addressing by child indices.
pub mod path;
/// Points, ranges and locations inside a document tree.
pub mod range;

pub use edit::{EditError, Result};
pub use key::{Key, KeyCode, KeyParseError, Modifiers};
pub use movement::{CharClass, Unit};
pub use path::Path;
pub use range::{Affinity, CharIdx, Edge, Location, Point, Range};
