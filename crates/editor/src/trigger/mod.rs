//! Cursor-context triggers.
//!
//! After every committed change the [`TriggerDetector`] looks at the text
//! just before a collapsed cursor: one word unit back, then one more
//! character. If that text matches a registered [`Trigger`] and nothing but
//! whitespace follows the cursor, the detector is [`TriggerState::Pending`]
//! and an overlay can offer candidates for the matched text.

use std::fmt;

use quire_document::{Document, Element, ElementKind, Range, Schema, Unit};
use regex::Regex;
use serde_json::Value;

use crate::config::{ConfigError, Result};

#[cfg(test)]
mod tests;

/// A named pattern and the void element a commit inserts for it.
#[derive(Debug, Clone)]
pub struct Trigger {
	name: String,
	pattern: Regex,
	element: ElementKind,
}

impl Trigger {
	pub fn new(name: &str, pattern: &str, element: ElementKind) -> Result<Self> {
		let pattern = Regex::new(pattern).map_err(|error| ConfigError::Regex {
			name: name.to_string(),
			error,
		})?;
		Ok(Self {
			name: name.to_string(),
			pattern,
			element,
		})
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn pattern(&self) -> &Regex {
		&self.pattern
	}

	pub fn element(&self) -> ElementKind {
		self.element
	}

	/// Matches `text` and returns the search string: the first capture
	/// group, or empty when the pattern has none.
	pub fn search(&self, text: &str) -> Option<String> {
		let captures = self.pattern.captures(text)?;
		Some(captures.get(1).map_or_else(String::new, |m| m.as_str().to_string()))
	}

	/// The element inserted when `value` is committed for this trigger.
	pub fn element_for(&self, value: Value) -> Element {
		match self.element {
			ElementKind::Mention => Element::mention(value),
			kind => {
				let element = Element::void(kind);
				if value.is_null() {
					element
				} else {
					element.with_attr("value", value)
				}
			}
		}
	}
}

/// A live match around the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerMatch {
	/// Name of the trigger that matched.
	pub trigger: String,
	/// The matched text, ending at the cursor.
	pub range: Range,
	pub search: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TriggerState {
	#[default]
	Idle,
	Pending(TriggerMatch),
}

impl TriggerState {
	pub fn pending(&self) -> Option<&TriggerMatch> {
		match self {
			TriggerState::Pending(m) => Some(m),
			TriggerState::Idle => None,
		}
	}

	pub fn is_pending(&self) -> bool {
		matches!(self, TriggerState::Pending(_))
	}
}

/// A change of [`TriggerState`], reported to the overlay controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerTransition {
	Opened(TriggerMatch),
	Updated(TriggerMatch),
	Closed,
}

impl fmt::Display for TriggerTransition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TriggerTransition::Opened(m) => write!(f, "opened {} {:?}", m.trigger, m.search),
			TriggerTransition::Updated(m) => write!(f, "updated {} {:?}", m.trigger, m.search),
			TriggerTransition::Closed => f.write_str("closed"),
		}
	}
}

/// Idle/Pending state machine over the registered triggers.
#[derive(Debug, Clone, Default)]
pub struct TriggerDetector {
	triggers: Vec<Trigger>,
	state: TriggerState,
	/// Range of a dismissed match. Suppresses it until the range changes.
	dismissed: Option<Range>,
}

impl TriggerDetector {
	pub fn new(triggers: Vec<Trigger>) -> Self {
		Self {
			triggers,
			..Self::default()
		}
	}

	pub fn triggers(&self) -> &[Trigger] {
		&self.triggers
	}

	pub fn trigger(&self, name: &str) -> Option<&Trigger> {
		self.triggers.iter().find(|t| t.name == name)
	}

	pub fn state(&self) -> &TriggerState {
		&self.state
	}

	/// Finds the match at a collapsed `selection`, ignoring dismissal.
	///
	/// Triggers are tried in registration order and the first whose pattern
	/// matches decides the outcome.
	pub fn detect(&self, document: &Document, selection: Option<&Range>, schema: &Schema) -> Option<TriggerMatch> {
		let selection = selection.filter(|range| range.is_collapsed())?;
		let start = selection.start();
		let word_before = document.before(start, Unit::Word, schema)?;
		let before = document.before(&word_before, Unit::Character, schema)?;
		let range = Range::new(before, start.clone());
		let text = document.string(&range);

		let (trigger, search) = self
			.triggers
			.iter()
			.find_map(|trigger| trigger.search(&text).map(|search| (trigger, search)))?;

		let after = document
			.after(start, Unit::Character, schema)
			.map(|after| document.string(&Range::new(start.clone(), after)))
			.unwrap_or_default();
		if !after.chars().all(char::is_whitespace) {
			tracing::trace!(trigger = trigger.name(), after = %after, "trigger followed by text");
			return None;
		}

		Some(TriggerMatch {
			trigger: trigger.name.clone(),
			range,
			search,
		})
	}

	/// Re-evaluates after a change. Returns the transition, if the state moved.
	pub fn evaluate(
		&mut self,
		document: &Document,
		selection: Option<&Range>,
		schema: &Schema,
	) -> Option<TriggerTransition> {
		let detected = self.detect(document, selection, schema);
		tracing::trace!(matched = detected.is_some(), "trigger evaluation");
		let detected = match (detected, &self.dismissed) {
			(Some(m), Some(dismissed)) if m.range == *dismissed => None,
			(detected, _) => {
				self.dismissed = None;
				detected
			}
		};
		self.transition(detected)
	}

	/// Drops a pending match without touching the document.
	pub fn dismiss(&mut self) -> Option<TriggerTransition> {
		let TriggerState::Pending(m) = &self.state else {
			return None;
		};
		self.dismissed = Some(m.range.clone());
		self.transition(None)
	}

	fn transition(&mut self, next: Option<TriggerMatch>) -> Option<TriggerTransition> {
		let next = next.map_or(TriggerState::Idle, TriggerState::Pending);
		if next == self.state {
			return None;
		}
		let transition = match (&self.state, &next) {
			(_, TriggerState::Idle) => TriggerTransition::Closed,
			(TriggerState::Idle, TriggerState::Pending(m)) => TriggerTransition::Opened(m.clone()),
			(TriggerState::Pending(_), TriggerState::Pending(m)) => TriggerTransition::Updated(m.clone()),
		};
		self.state = next;
		Some(transition)
	}
}
