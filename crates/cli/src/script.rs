//! Key scripts.
//!
//! Plain characters type themselves. A key in keymap notation goes between
//! angle brackets (`<enter>`, `<ctrl-b>`, `<alt-backspace>`), `<lt>` types a
//! literal `<` and a newline is Enter.

use anyhow::{Context, bail};
use quire_primitives::{Key, KeyCode};

#[cfg(test)]
mod tests;

pub fn parse(script: &str) -> anyhow::Result<Vec<Key>> {
	let mut keys = Vec::new();
	let mut rest = script;
	while let Some(c) = rest.chars().next() {
		if c != '<' {
			keys.push(match c {
				'\n' => Key::plain(KeyCode::Enter),
				c => Key::char(c),
			});
			rest = &rest[c.len_utf8()..];
			continue;
		}

		let Some(end) = rest.find('>') else {
			bail!("unclosed `<` in key script at `{rest}`");
		};
		let name = &rest[1..end];
		keys.push(match name {
			"lt" => Key::char('<'),
			_ => name.parse().with_context(|| format!("in key script at `<{name}>`"))?,
		});
		rest = &rest[end + 1..];
	}
	Ok(keys)
}
