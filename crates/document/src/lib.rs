//! Document tree, schema extension layer and transform engine.
//!
//! A [`Document`] owns a tree of [`Node`]s. Reads go through the document
//! directly; every mutation goes through a [`Transform`], which applies
//! invertible [`Operation`]s and keeps the selection consistent with them.

pub mod document;
pub mod node;
pub mod operation;
pub mod query;
pub mod schema;
pub mod transforms;

pub use document::Document;
pub use node::{Attrs, Element, ElementKind, Marks, Node, Props, Text};
pub use operation::Operation;
pub use query::{Mode, NodeEntry, Nodes, NodesOptions};
pub use quire_primitives::{Affinity, Edge, EditError, Location, Path, Point, Range, Result, Unit};
pub use schema::{FnExtension, KindOverrides, Schema, SchemaExtension};
pub use transforms::{DeleteOptions, MoveOptions, SetNodesOptions, Transform};
