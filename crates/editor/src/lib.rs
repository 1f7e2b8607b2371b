//! Editor layer of the quire document core.
//!
//! An [`Editor`] owns a document, its selection and its schema. Changes run
//! through [`Editor::transact`], which notifies subscribers once per change
//! and re-evaluates the [`TriggerDetector`]. Keys from the host go through
//! [`Editor::handle_key`].

pub mod commands;
pub mod config;
mod editor;
pub mod keys;
pub mod overlay;
pub mod render;
pub mod trigger;

pub use commands::Command;
pub use config::{Binding, ConfigError, EditorConfig, TriggerConfig};
pub use editor::{BuildError, ChangeEvent, Editor, EditorBuilder, ListenerId};
pub use keys::KeyOutcome;
pub use overlay::{CandidateList, OverlayController, OverlayData, filter_candidates};
pub use render::{ElementView, NodeAttachment, RenderRegistry, TextView};
pub use trigger::{Trigger, TriggerDetector, TriggerMatch, TriggerState, TriggerTransition};
