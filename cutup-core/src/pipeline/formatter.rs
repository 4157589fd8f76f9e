use std::io::{self, Write};

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::FlickerConfig;
use crate::pipeline::packer::Line;
use crate::stream::ThrottledWriter;

/// Joins lines with a single `\n`. No lines gives an empty string.
pub fn format_plain(lines: &[Line]) -> String {
	lines.iter().map(Line::text).collect::<Vec<_>>().join("\n")
}

/// Streams the plain rendering into a throttled writer.
///
/// Returns the number of characters written, which is smaller than the
/// rendering if the writer was cancelled.
pub fn write_plain<W: Write>(lines: &[Line], out: &mut ThrottledWriter<W>) -> io::Result<usize> {
	out.write_text(&format_plain(lines))
}

/// Encodes a word for the flicker effect.
///
/// Unpadded standard base64 of the UTF-8 bytes: text-safe, reversible with
/// [`reveal`], and about 4/3 of the original length.
pub fn obfuscate(word: &str) -> String {
	STANDARD_NO_PAD.encode(word.as_bytes())
}

/// Decodes an [`obfuscate`]d word. Returns `None` for anything else.
pub fn reveal(obfuscated: &str) -> Option<String> {
	let bytes = STANDARD_NO_PAD.decode(obfuscated).ok()?;
	String::from_utf8(bytes).ok()
}

/// Alternation direction of a line.
///
/// Even lines run forward (start on the plain word), odd lines run in
/// reverse (start on the obfuscated word).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlickerDirection {
	Forward,
	Reverse,
}

impl FlickerDirection {
	pub fn for_line(index: usize) -> Self {
		if index % 2 == 0 { FlickerDirection::Forward } else { FlickerDirection::Reverse }
	}

	/// `1` for forward, `-1` for reverse.
	pub fn sign(&self) -> i8 {
		match self {
			FlickerDirection::Forward => 1,
			FlickerDirection::Reverse => -1,
		}
	}
}

/// A word with both representations and its animation timing.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FlickerWord {
	pub original: String,
	pub obfuscated: String,
	pub starts_plain: bool,
	/// Animation delay, in seconds.
	pub delay_secs: f64,
	/// Toggle interval, in milliseconds.
	pub interval_ms: f64,
}

impl FlickerWord {
	/// Representation shown before the first toggle.
	pub fn initial(&self) -> &str {
		if self.starts_plain { &self.original } else { &self.obfuscated }
	}

	/// Representation shown `elapsed_secs` after the animation started.
	///
	/// The word holds its initial side until its delay has passed, then
	/// toggles once per interval.
	pub fn shown_at(&self, elapsed_secs: f64) -> &str {
		let running = (elapsed_secs - self.delay_secs).max(0.0) * 1000.0;
		let toggles = (running / self.interval_ms).floor() as u64;
		let plain = self.starts_plain ^ (toggles % 2 == 1);
		if plain { &self.original } else { &self.obfuscated }
	}
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FlickerLine {
	pub direction: FlickerDirection,
	pub words: Vec<FlickerWord>,
}

/// Structured flicker rendering, ready for a presentation layer.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FlickerPoem {
	pub lines: Vec<FlickerLine>,
	/// Line spacing multiplier drawn once per poem.
	pub line_spacing: f64,
}

impl FlickerPoem {
	/// The poem as plain text (original words only).
	pub fn plain_text(&self) -> String {
		self.lines
			.iter()
			.map(|line| line.words.iter().map(|w| w.original.as_str()).collect::<Vec<_>>().join(" "))
			.collect::<Vec<_>>()
			.join("\n")
	}
}

fn uniform<R: Rng + ?Sized>(range: (f64, f64), rng: &mut R) -> f64 {
	if range.0 < range.1 { rng.random_range(range.0..=range.1) } else { range.0 }
}

/// Builds the flicker rendering of `lines`.
///
/// # Behavior
/// - Line `i` runs `Forward` when `i` is even, `Reverse` otherwise
/// - Word `j` of a line gets a delay of `j * stagger_secs`
/// - Each word draws its own interval from `config.interval_ms`
/// - The poem draws one line spacing multiplier from `config.line_spacing`
pub fn format_flicker<R: Rng + ?Sized>(lines: &[Line], config: &FlickerConfig, rng: &mut R) -> FlickerPoem {
	let lines = lines
		.iter()
		.enumerate()
		.map(|(line_index, line)| {
			let direction = FlickerDirection::for_line(line_index);
			let words = line
				.words
				.iter()
				.enumerate()
				.map(|(word_index, word)| FlickerWord {
					original: word.clone(),
					obfuscated: obfuscate(word),
					starts_plain: direction == FlickerDirection::Forward,
					delay_secs: word_index as f64 * config.stagger_secs,
					interval_ms: uniform(config.interval_ms, rng),
				})
				.collect();
			FlickerLine { direction, words }
		})
		.collect();

	FlickerPoem { lines, line_spacing: uniform(config.line_spacing, rng) }
}
