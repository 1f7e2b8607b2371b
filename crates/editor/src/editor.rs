//! The editor instance.

use std::fmt;

use quire_document::{
	Document, EditError, Element, Location, Marks, MoveOptions, Operation, Path, Range, Schema, SchemaExtension,
	Transform, Unit,
};
use serde_json::Value;
use thiserror::Error;

use crate::config::{ConfigError, EditorConfig, TriggerConfig};
use crate::overlay::{OverlayController, OverlayData};
use crate::trigger::{TriggerDetector, TriggerState, TriggerTransition};

#[cfg(test)]
mod tests;

/// One committed change, as delivered to subscribers.
#[derive(Debug, Clone, Copy)]
pub struct ChangeEvent<'a> {
	pub operations: &'a [Operation],
	pub document: &'a Document,
	pub selection: Option<&'a Range>,
}

type Listener = Box<dyn FnMut(&ChangeEvent<'_>)>;

/// Handle returned by [`Editor::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

/// Errors from [`EditorBuilder::build`].
#[derive(Debug, Error)]
pub enum BuildError {
	#[error(transparent)]
	Config(#[from] ConfigError),
	#[error("invalid initial document: {0}")]
	Document(#[from] EditError),
}

/// Builds an [`Editor`]. Schema extensions can only be installed here.
pub struct EditorBuilder {
	schema: Schema,
	config: EditorConfig,
	document: Document,
	selection: Option<Range>,
	overlay: Option<Box<dyn OverlayController>>,
}

impl Default for EditorBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl EditorBuilder {
	/// A builder with the base extensions and the default configuration.
	pub fn new() -> Self {
		Self {
			schema: Schema::with_defaults(),
			config: EditorConfig::default(),
			document: Document::default(),
			selection: None,
			overlay: None,
		}
	}

	/// A builder whose schema has no extensions installed.
	pub fn bare() -> Self {
		Self {
			schema: Schema::new(),
			..Self::new()
		}
	}

	/// Installs a schema extension. Later extensions take precedence for the
	/// kinds they answer.
	pub fn extension(mut self, extension: impl SchemaExtension + 'static) -> Self {
		self.schema.install(extension);
		self
	}

	pub fn config(mut self, config: EditorConfig) -> Self {
		self.config = config;
		self
	}

	/// Registers a trigger after the configured ones.
	pub fn trigger(mut self, trigger: TriggerConfig) -> Self {
		self.config.triggers.push(trigger);
		self
	}

	pub fn document(mut self, document: Document) -> Self {
		self.document = document;
		self
	}

	pub fn selection(mut self, selection: Range) -> Self {
		self.selection = Some(selection);
		self
	}

	pub fn overlay(mut self, controller: impl OverlayController + 'static) -> Self {
		self.overlay = Some(Box::new(controller));
		self
	}

	pub fn build(self) -> Result<Editor, BuildError> {
		let triggers = self
			.config
			.triggers
			.iter()
			.map(TriggerConfig::compile)
			.collect::<Result<Vec<_>, _>>()?;
		self.document.validate(&self.schema)?;
		if let Some(range) = &self.selection {
			self.document.check_point(&range.anchor)?;
			self.document.check_point(&range.focus)?;
		}
		tracing::debug!(
			extensions = ?self.schema.extension_names().collect::<Vec<_>>(),
			triggers = triggers.len(),
			"editor built"
		);

		let mut editor = Editor {
			document: self.document,
			selection: self.selection,
			schema: self.schema,
			pending_marks: None,
			detector: TriggerDetector::new(triggers),
			config: self.config,
			overlay: self.overlay,
			listeners: Vec::new(),
			next_listener: 0,
		};
		editor.evaluate_triggers();
		Ok(editor)
	}
}

/// A document, its selection and everything that reacts to changes of them.
pub struct Editor {
	pub(crate) document: Document,
	pub(crate) selection: Option<Range>,
	pub(crate) schema: Schema,
	/// Marks for the next inserted text at a collapsed selection.
	pub(crate) pending_marks: Option<Marks>,
	pub(crate) detector: TriggerDetector,
	pub(crate) config: EditorConfig,
	pub(crate) overlay: Option<Box<dyn OverlayController>>,
	listeners: Vec<(ListenerId, Listener)>,
	next_listener: usize,
}

impl Editor {
	pub fn builder() -> EditorBuilder {
		EditorBuilder::new()
	}

	pub fn document(&self) -> &Document {
		&self.document
	}

	pub fn selection(&self) -> Option<&Range> {
		self.selection.as_ref()
	}

	pub fn schema(&self) -> &Schema {
		&self.schema
	}

	pub fn config(&self) -> &EditorConfig {
		&self.config
	}

	pub fn pending_marks(&self) -> Option<&Marks> {
		self.pending_marks.as_ref()
	}

	pub fn trigger_state(&self) -> &TriggerState {
		self.detector.state()
	}

	/// Overlay input while a trigger is pending.
	pub fn overlay_data(&self) -> Option<OverlayData> {
		self.detector.state().pending().map(OverlayData::from)
	}

	pub fn overlay(&self) -> Option<&dyn OverlayController> {
		self.overlay.as_deref()
	}

	/// Registers `listener` for every committed change.
	pub fn subscribe(&mut self, listener: impl FnMut(&ChangeEvent<'_>) + 'static) -> ListenerId {
		let id = ListenerId(self.next_listener);
		self.next_listener += 1;
		self.listeners.push((id, Box::new(listener)));
		id
	}

	pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
		let len = self.listeners.len();
		self.listeners.retain(|(listener, _)| *listener != id);
		self.listeners.len() != len
	}

	/// Runs `f` as one change.
	///
	/// Everything `f` applies is undone if it fails. Otherwise subscribers are
	/// notified once and triggers re-evaluated once, after `f` returns.
	pub fn transact<T>(&mut self, f: impl FnOnce(&mut Transform<'_>) -> quire_document::Result<T>) -> quire_document::Result<T> {
		let mut tx = Transform::new(&mut self.document, &mut self.selection, &self.schema);
		let result = tx.atomic(f);
		let operations = tx.into_operations();
		if !operations.is_empty() {
			self.changed(&operations);
		}
		result
	}

	fn changed(&mut self, operations: &[Operation]) {
		if operations.iter().any(|op| matches!(op, Operation::SetSelection { .. })) {
			self.pending_marks = None;
		}
		self.evaluate_triggers();

		let event = ChangeEvent {
			operations,
			document: &self.document,
			selection: self.selection.as_ref(),
		};
		for (_, listener) in &mut self.listeners {
			listener(&event);
		}
	}

	fn evaluate_triggers(&mut self) {
		let transition = self
			.detector
			.evaluate(&self.document, self.selection.as_ref(), &self.schema);
		if let Some(transition) = transition {
			self.report(&transition);
		}
	}

	fn report(&mut self, transition: &TriggerTransition) {
		tracing::debug!(%transition, "trigger transition");
		if let Some(overlay) = self.overlay.as_mut() {
			overlay.on_transition(transition);
		}
	}

	/// Dismisses a pending trigger. Returns false when none was pending.
	pub fn dismiss(&mut self) -> bool {
		match self.detector.dismiss() {
			Some(transition) => {
				self.report(&transition);
				true
			}
			None => false,
		}
	}

	/// Replaces the pending match with the element for `value`.
	///
	/// Selects the matched text, inserts the trigger's element over it and
	/// moves the cursor one character forward so it sits after the element.
	/// A block element at the end of the document gets an empty paragraph
	/// after it to hold the cursor. Returns false when nothing was pending.
	pub fn commit(&mut self, value: Value) -> quire_document::Result<bool> {
		let Some(pending) = self.detector.state().pending().cloned() else {
			return Ok(false);
		};
		let Some(trigger) = self.detector.trigger(&pending.trigger) else {
			return Ok(false);
		};
		let element = trigger.element_for(value);
		tracing::debug!(trigger = %pending.trigger, range = %pending.range, "commit");

		self.transact(|tx| {
			tx.select(pending.range.clone())?;
			tx.insert_nodes(vec![element.into()], None)?;

			if let Some(cursor) = tx.selection().map(|range| range.focus.clone())
				&& tx.document().after(&cursor, Unit::Character, tx.schema()).is_none()
			{
				let end = Path::new([tx.document().children().len()]);
				tx.insert_nodes(vec![Element::paragraph("").into()], Some(Location::Path(end)))?;
			}
			tx.move_selection(MoveOptions::default())
		})?;
		Ok(true)
	}

	/// Commits the overlay's chosen candidate.
	///
	/// Without an overlay, or when it has no choice, the search text is
	/// committed instead, and `null` for a pattern that captured nothing.
	pub fn commit_selected(&mut self) -> quire_document::Result<bool> {
		let Some(data) = self.overlay_data() else {
			return Ok(false);
		};
		let value = match self.overlay.as_mut().and_then(|overlay| overlay.chosen(&data)) {
			Some(value) => value,
			None if data.search.is_empty() => Value::Null,
			None => Value::String(data.search),
		};
		self.commit(value)
	}
}

impl fmt::Debug for Editor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Editor")
			.field("document", &self.document)
			.field("selection", &self.selection)
			.field("schema", &self.schema)
			.field("trigger", self.detector.state())
			.field("overlay", &self.overlay.as_ref().map(|o| o.name()))
			.finish_non_exhaustive()
	}
}
