//! The host side of trigger overlays.
//!
//! The editor reports [`TriggerTransition`]s to an [`OverlayController`],
//! forwards arrow keys to it while a trigger is pending, and asks it for the
//! chosen candidate when the user commits.

use quire_document::Range;
use quire_primitives::{Key, KeyCode};
use serde_json::{Value, json};

use crate::trigger::{TriggerMatch, TriggerTransition};

#[cfg(test)]
mod tests;

/// What an overlay needs while a trigger is pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayData {
	/// Name of the pending trigger.
	pub trigger: String,
	/// Matched text range, for positioning.
	pub range: Range,
	pub search: String,
	/// Input the candidate list is filtered by.
	pub filter: String,
}

impl From<&TriggerMatch> for OverlayData {
	fn from(m: &TriggerMatch) -> Self {
		Self {
			trigger: m.trigger.clone(),
			range: m.range.clone(),
			search: m.search.clone(),
			filter: m.search.clone(),
		}
	}
}

pub trait OverlayController: Send {
	fn name(&self) -> &'static str;

	fn on_transition(&mut self, transition: &TriggerTransition);

	/// Handles a navigation key. Returns true if consumed.
	fn on_key(&mut self, key: &Key) -> bool {
		let _ = key;
		false
	}

	/// The value to commit, or `None` to fall back to the search text.
	fn chosen(&mut self, data: &OverlayData) -> Option<Value>;
}

/// Candidates containing `filter`, compared case-insensitively, in order.
pub fn filter_candidates<'a, S: AsRef<str>>(candidates: &'a [S], filter: &str) -> Vec<&'a str> {
	let filter = filter.to_lowercase();
	candidates
		.iter()
		.map(AsRef::as_ref)
		.filter(|candidate| candidate.to_lowercase().contains(&filter))
		.collect()
}

/// A picker over a fixed list of titles.
///
/// Up/Down move the highlight through the filtered list; committing yields
/// `{"title": ...}` for the highlighted candidate.
#[derive(Debug, Clone, Default)]
pub struct CandidateList {
	candidates: Vec<String>,
	filter: Option<String>,
	selected: usize,
}

impl CandidateList {
	pub fn new(candidates: impl IntoIterator<Item = impl Into<String>>) -> Self {
		Self {
			candidates: candidates.into_iter().map(Into::into).collect(),
			..Self::default()
		}
	}

	pub fn is_open(&self) -> bool {
		self.filter.is_some()
	}

	/// Candidates matching the current filter. Empty while closed.
	pub fn visible(&self) -> Vec<&str> {
		match &self.filter {
			Some(filter) => filter_candidates(&self.candidates, filter),
			None => Vec::new(),
		}
	}

	pub fn selected(&self) -> Option<&str> {
		self.visible().get(self.selected).copied()
	}
}

impl OverlayController for CandidateList {
	fn name(&self) -> &'static str {
		"candidates"
	}

	fn on_transition(&mut self, transition: &TriggerTransition) {
		match transition {
			TriggerTransition::Opened(m) | TriggerTransition::Updated(m) => {
				self.filter = Some(m.search.clone());
				self.selected = 0;
			}
			TriggerTransition::Closed => {
				self.filter = None;
				self.selected = 0;
			}
		}
	}

	fn on_key(&mut self, key: &Key) -> bool {
		let len = self.visible().len();
		if len == 0 {
			return false;
		}
		match key.code {
			KeyCode::Down => self.selected = (self.selected + 1) % len,
			KeyCode::Up => self.selected = (self.selected + len - 1) % len,
			_ => return false,
		}
		true
	}

	fn chosen(&mut self, _data: &OverlayData) -> Option<Value> {
		self.selected().map(|title| json!({ "title": title }))
	}
}
