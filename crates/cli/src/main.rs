//! `quire`: replays a key script against an editor and prints the resulting
//! tree, selection and trigger state.

mod cli;
mod script;

use std::fs;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use quire_document::{Document, Path, Range};
use quire_editor::{CandidateList, Editor, EditorConfig, RenderRegistry, TriggerState};
use tracing::{debug, info};

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose);

	let document = match &cli.document {
		Some(path) => {
			let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
			serde_json::from_str::<Document>(&json).with_context(|| format!("parsing {}", path.display()))?
		}
		None => Document::default(),
	};
	let config = match &cli.config {
		Some(path) => EditorConfig::load(path)?,
		None => EditorConfig::default(),
	};
	let keys = script::parse(&cli.script.join(" "))?;

	let cursor = document.end(&Path::root()).context("document has no text to place the cursor in")?;
	let mut builder = Editor::builder()
		.config(config)
		.document(document)
		.selection(Range::collapsed(cursor));
	if !cli.candidates.is_empty() {
		builder = builder.overlay(CandidateList::new(cli.candidates.iter().cloned()));
	}
	let mut editor = builder.build()?;

	info!(keys = keys.len(), "replaying script");
	for key in keys {
		let outcome = editor.handle_key(key);
		debug!(%key, ?outcome, "key");
	}

	report(&editor, cli.json)
}

fn report(editor: &Editor, json: bool) -> anyhow::Result<()> {
	if json {
		println!("{}", serde_json::to_string_pretty(editor.document())?);
	} else {
		for block in RenderRegistry::markup().render(editor.document(), editor.schema()) {
			println!("{block}");
		}
	}

	match editor.selection() {
		Some(range) => println!("selection: {range}"),
		None => println!("selection: none"),
	}
	match editor.trigger_state() {
		TriggerState::Idle => println!("trigger: idle"),
		TriggerState::Pending(m) => println!("trigger: {} {:?} at {}", m.trigger, m.search, m.range),
	}
	Ok(())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env("QUIRE_LOG").unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("quire=trace,quire_editor=trace,quire_document=debug,info")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(true)
		.init();
}
