use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{CutupConfig, OutputMode, Preset};
use crate::error::CutupError;
use crate::pipeline::formatter::{FlickerPoem, format_flicker, format_plain};
use crate::pipeline::normalizer::{normalize, words};
use crate::pipeline::packer::{PoemLines, pack_lines};
use crate::pipeline::retention::compute_retention;
use crate::pipeline::sampler::sample;

/// Result of one pipeline run, before formatting.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Poem {
	pub lines: PoemLines,
	/// Retention fraction used for sampling.
	pub retention: f64,
	/// Number of words in the normalized source.
	pub source_words: usize,
	/// Length of the normalized source, in characters.
	pub cleaned_length: usize,
}

impl Poem {
	/// Percentage of source words dropped, as reported to users.
	pub fn reduction_percent(&self) -> f64 {
		(1.0 - self.retention) * 100.0
	}

	pub fn word_count(&self) -> usize {
		self.lines.iter().map(|line| line.words.len()).sum()
	}

	pub fn plain(&self) -> String {
		format_plain(&self.lines)
	}
}

/// Rendered poem.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "mode", content = "poem", rename_all = "lowercase")]
pub enum Output {
	Plain(String),
	Flicker(FlickerPoem),
}

/// High-level cut-up transformer.
///
/// # Responsibilities
/// - Hold a validated `CutupConfig`
/// - Chain normalize → retention → sample → pack for a source text
/// - Render the packed lines in the configured output mode
///
/// A `CutUp` holds no mutable state: each run is a pure function of the
/// source text, the configuration and the supplied random source.
#[derive(Clone, Debug)]
pub struct CutUp {
	config: CutupConfig,
}

impl CutUp {
	/// Creates a transformer from a configuration.
	///
	/// # Errors
	/// Returns `InvalidConfiguration` if the configuration does not validate.
	pub fn new(config: CutupConfig) -> Result<Self, CutupError> {
		config.validate()?;
		Ok(Self { config })
	}

	/// Creates a transformer from a named preset.
	pub fn from_preset(preset: Preset) -> Self {
		Self { config: preset.config() }
	}

	pub fn config(&self) -> &CutupConfig {
		&self.config
	}

	/// Runs the reduction-and-lineation pipeline.
	///
	/// # Parameters
	/// - `text`: Raw source text.
	/// - `rng`: Random source for the retention draw, sampling and budget windows.
	///
	/// # Errors
	/// - `EmptyInput` if no word survives normalization
	/// - `InvalidConfiguration` if the fixed retention is out of range
	pub fn run<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> Result<Poem, CutupError> {
		let cleaned = normalize(text, self.config.keep_digits);
		let source = words(&cleaned);
		if source.is_empty() {
			warn!(raw_length = text.len(), "No words left after cleaning");
			return Err(CutupError::EmptyInput);
		}

		let source_words = source.len();
		let cleaned_length = cleaned.len();
		let retention = compute_retention(cleaned_length, &self.config.retention, self.config.fixed_retention, rng)?;

		let sampled = sample(source, retention, rng);
		debug!(source_words, sampled = sampled.len(), "Sampled words");

		let lines = pack_lines(sampled, &self.config.budget, rng)?;
		info!(
			source_words,
			retention,
			lines = lines.len(),
			"Cut-up complete"
		);

		Ok(Poem { lines, retention, source_words, cleaned_length })
	}

	/// Renders a poem in the configured output mode.
	pub fn render<R: Rng + ?Sized>(&self, poem: &Poem, rng: &mut R) -> Output {
		match self.config.output {
			OutputMode::Plain => Output::Plain(poem.plain()),
			OutputMode::Flicker => Output::Flicker(format_flicker(&poem.lines, &self.config.flicker, rng)),
		}
	}

	/// Runs the pipeline and renders the result.
	pub fn transform<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> Result<Output, CutupError> {
		let poem = self.run(text, rng)?;
		Ok(self.render(&poem, rng))
	}
}
