use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "quire")]
#[command(about = "Replay a key script against a quire editor")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Keys to replay, e.g. `hi @jo<enter>` or `<ctrl-b>bold`. Arguments are
	/// joined with spaces.
	pub script: Vec<String>,

	/// Initial document as JSON (one empty paragraph if omitted)
	#[arg(long, short = 'd', value_name = "PATH")]
	pub document: Option<PathBuf>,

	/// Editor configuration file (TOML)
	#[arg(long, short = 'c', value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Candidate offered while a trigger is pending; repeatable
	#[arg(long = "candidate", value_name = "TITLE")]
	pub candidates: Vec<String>,

	/// Print the document as JSON instead of markup
	#[arg(long)]
	pub json: bool,

	/// Verbose logging
	#[arg(short, long)]
	pub verbose: bool,
}
