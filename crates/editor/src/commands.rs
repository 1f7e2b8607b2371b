//! Editor commands: mark and block toggles, text entry and cursor motion.
//!
//! Toggles follow read-then-invert: the current state is read first and the
//! opposite is applied through `set_nodes`.

use std::fmt;
use std::str::FromStr;

use quire_document::node::is_truthy;
use quire_document::{
	DeleteOptions, ElementKind, Marks, MoveOptions, NodesOptions, Props, Result, SetNodesOptions, Unit,
};
use serde_json::Value;

use crate::editor::Editor;

/// A command a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
	ToggleBold,
	ToggleItalic,
	ToggleCode,
	ToggleTodo,
	InsertBreak,
}

impl Command {
	pub const ALL: [Command; 5] = [
		Command::ToggleBold,
		Command::ToggleItalic,
		Command::ToggleCode,
		Command::ToggleTodo,
		Command::InsertBreak,
	];

	pub fn name(self) -> &'static str {
		match self {
			Command::ToggleBold => "toggle-bold",
			Command::ToggleItalic => "toggle-italic",
			Command::ToggleCode => "toggle-code",
			Command::ToggleTodo => "toggle-todo",
			Command::InsertBreak => "insert-break",
		}
	}
}

impl fmt::Display for Command {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown command `{0}`")]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
	type Err = UnknownCommand;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|command| command.name() == s)
			.ok_or_else(|| UnknownCommand(s.to_string()))
	}
}

impl Editor {
	pub fn run(&mut self, command: Command) -> Result<()> {
		tracing::debug!(%command, "run command");
		match command {
			Command::ToggleBold => self.toggle_mark("bold"),
			Command::ToggleItalic => self.toggle_mark("italic"),
			Command::ToggleCode => self.toggle_mark("code"),
			Command::ToggleTodo => self.toggle_block(ElementKind::Todo),
			Command::InsertBreak => self.insert_break(),
		}
	}

	/// Marks the next typed text gets: the pending marks, or those of the run
	/// at the selection start.
	pub fn marks(&self) -> Option<Marks> {
		if let Some(marks) = &self.pending_marks {
			return Some(marks.clone());
		}
		let range = self.selection.as_ref()?;
		self.document.text(&range.start().path).ok().map(|text| text.marks.clone())
	}

	/// Whether `mark` is set. An expanded selection requires it on every text
	/// run it covers.
	pub fn is_mark_active(&self, mark: &str) -> bool {
		let Some(range) = self.selection.as_ref() else {
			return false;
		};
		if range.is_collapsed() {
			return self
				.marks()
				.is_some_and(|marks| marks.get(mark).is_some_and(is_truthy));
		}
		let options = NodesOptions::new()
			.at(range.clone())
			.universal(true)
			.matching(|node, _| node.as_text().is_some_and(|text| text.has_mark(mark)));
		self.document
			.nodes(&self.schema, options)
			.is_ok_and(|mut nodes| nodes.next().is_some())
	}

	/// Flips `mark` over the selection. A collapsed selection only changes
	/// the pending marks.
	pub fn toggle_mark(&mut self, mark: &str) -> Result<()> {
		let active = self.is_mark_active(mark);
		let Some(range) = self.selection.clone() else {
			return Ok(());
		};

		if range.is_collapsed() {
			let mut marks = self.marks().unwrap_or_default();
			if active {
				marks.remove(mark);
			} else {
				marks.insert(mark.to_string(), Value::Bool(true));
			}
			tracing::trace!(mark, set = !active, "pending marks");
			self.pending_marks = Some(marks);
			return Ok(());
		}

		let props = if active { Props::unset(mark) } else { Props::mark(mark) };
		let options = SetNodesOptions {
			split: true,
			..SetNodesOptions::default()
		};
		self.transact(|tx| tx.set_nodes(&props, |node, _| node.is_text(), options))
	}

	pub fn toggle_bold(&mut self) -> Result<()> {
		self.toggle_mark("bold")
	}

	/// Whether a block of `kind` is in the selection.
	pub fn is_block_active(&self, kind: ElementKind) -> bool {
		let Some(range) = self.selection.as_ref() else {
			return false;
		};
		let schema = &self.schema;
		let options = NodesOptions::new()
			.at(range.clone())
			.matching(|node, _| node.kind() == Some(kind) && schema.is_block(node));
		self.document
			.nodes(schema, options)
			.is_ok_and(|mut nodes| nodes.next().is_some())
	}

	/// Turns the selected blocks into `kind`, or back into paragraphs.
	pub fn toggle_block(&mut self, kind: ElementKind) -> Result<()> {
		let active = self.is_block_active(kind);
		let mut props = Props::kind(if active { ElementKind::Paragraph } else { kind });
		if kind == ElementKind::Todo {
			props = props.with("checked", if active { Value::Null } else { Value::Bool(false) });
		}
		self.transact(|tx| {
			let schema = tx.schema();
			tx.set_nodes(
				&props,
				|node, _| schema.is_block(node) && !schema.is_void(node),
				SetNodesOptions::default(),
			)
		})
	}

	pub fn toggle_todo(&mut self) -> Result<()> {
		self.toggle_block(ElementKind::Todo)
	}

	/// Types `text` at the selection, carrying the pending marks if any.
	pub fn insert_text(&mut self, text: &str) -> Result<()> {
		match self.pending_marks.clone() {
			Some(marks) => self.transact(|tx| tx.insert_marked_text(text, &marks, None)),
			None => self.transact(|tx| tx.insert_text(text, None)),
		}
	}

	/// Splits the block at the cursor.
	pub fn insert_break(&mut self) -> Result<()> {
		self.transact(|tx| tx.split_nodes(None, true))
	}

	pub fn delete_backward(&mut self, unit: Unit) -> Result<()> {
		self.transact(|tx| tx.delete(None, DeleteOptions::backward(unit)))
	}

	pub fn delete_forward(&mut self, unit: Unit) -> Result<()> {
		self.transact(|tx| tx.delete(None, DeleteOptions::forward(unit)))
	}

	pub fn move_cursor(&mut self, options: MoveOptions) -> Result<()> {
		self.transact(|tx| tx.move_selection(options))
	}
}
