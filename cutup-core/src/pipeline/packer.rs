use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BudgetPolicy;
use crate::error::CutupError;
use crate::pipeline::syllables::estimate_syllables;

/// Syllable window of a line: the line may close once it holds at least
/// `min` syllables and the next word would push it past `max`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyllableWindow {
	pub min: usize,
	pub max: usize,
}

/// One output row.
///
/// # Invariants
/// - `words` is never empty
/// - `syllables` is the sum of the estimates of `words`
/// - `window` is `None` for word-count policies
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Line {
	pub words: Vec<String>,
	pub syllables: usize,
	pub window: Option<SyllableWindow>,
}

impl Line {
	/// The line rendered with single spaces between words.
	pub fn text(&self) -> String {
		self.words.join(" ")
	}
}

/// Ordered lines of a poem, before formatting.
pub type PoemLines = Vec<Line>;

/// Draws a per-line window for the windowed policy.
///
/// A multiplier is drawn from `[multiplier_min, multiplier_max]` and applied
/// to both base bounds (truncated). Each bound then gets an independent
/// integer jitter of up to ±10% of itself. Finally `min >= 1` and
/// `max >= min + 1` are enforced.
pub fn draw_window<R: Rng + ?Sized>(
	base_min: usize,
	base_max: usize,
	multiplier_min: f64,
	multiplier_max: f64,
	rng: &mut R,
) -> SyllableWindow {
	let multiplier = if multiplier_min < multiplier_max {
		rng.random_range(multiplier_min..=multiplier_max)
	} else {
		multiplier_min
	};

	let mut min = (base_min as f64 * multiplier) as i64;
	let mut max = (base_max as f64 * multiplier) as i64;

	let min_jitter = (min as f64 * 0.1) as i64;
	let max_jitter = (max as f64 * 0.1) as i64;
	min += rng.random_range(-min_jitter..=min_jitter);
	max += rng.random_range(-max_jitter..=max_jitter);

	let min = min.max(1);
	let max = max.max(min + 1);
	SyllableWindow { min: min as usize, max: max as usize }
}

/// Accumulates words for the line being built.
#[derive(Default)]
struct LineBuilder {
	words: Vec<String>,
	syllables: usize,
}

impl LineBuilder {
	fn push(&mut self, word: String, syllables: usize) {
		self.words.push(word);
		self.syllables += syllables;
	}

	fn is_empty(&self) -> bool {
		self.words.is_empty()
	}

	fn finish(&mut self, window: Option<SyllableWindow>) -> Line {
		let words = std::mem::take(&mut self.words);
		let syllables = std::mem::take(&mut self.syllables);
		Line { words, syllables, window }
	}
}

/// Groups words into lines under a budget policy.
///
/// # Parameters
/// - `words`: Sampled words, consumed in order.
/// - `policy`: Line budget policy.
/// - `rng`: Random source for windowed and random-word policies.
///
/// # Behavior
/// Syllable policies (`Fixed`, `Bounded`, `Windowed`) append each word to the
/// current line unless the line is non-empty, has reached its window minimum,
/// and the word would push it past the window maximum. In that case the line
/// is closed and the word starts a new one. `Fixed { syllables: t }` is the
/// window `[1, t]`. `Windowed` draws a fresh window for every new line.
///
/// Word policies cut the sequence into chunks of a fixed or random size.
///
/// A word is never dropped: a single word larger than the budget forms its
/// own line. No words means no lines.
///
/// # Errors
/// Returns `InvalidConfiguration` if the policy is malformed.
pub fn pack_lines<R: Rng + ?Sized>(
	words: Vec<String>,
	policy: &BudgetPolicy,
	rng: &mut R,
) -> Result<PoemLines, CutupError> {
	policy.validate()?;
	let word_count = words.len();

	let lines = match *policy {
		BudgetPolicy::Fixed { syllables } => {
			let window = SyllableWindow { min: 1, max: syllables };
			pack_by_syllables(words, || window)
		}
		BudgetPolicy::Bounded { min, max } => {
			let window = SyllableWindow { min, max };
			pack_by_syllables(words, || window)
		}
		BudgetPolicy::Windowed { base_min, base_max, multiplier_min, multiplier_max } => {
			pack_by_syllables(words, || draw_window(base_min, base_max, multiplier_min, multiplier_max, rng))
		}
		BudgetPolicy::FixedWords { words: per_line } => pack_by_count(words, || per_line),
		BudgetPolicy::RandomWords { min, max } => pack_by_count(words, || rng.random_range(min..=max)),
	};

	debug!(words = word_count, lines = lines.len(), "Packed lines");
	Ok(lines)
}

fn pack_by_syllables<F>(words: Vec<String>, mut next_window: F) -> PoemLines
where
	F: FnMut() -> SyllableWindow,
{
	let mut lines = Vec::new();
	if words.is_empty() {
		return lines;
	}

	let mut window = next_window();
	let mut current = LineBuilder::default();

	for word in words {
		let syllables = estimate_syllables(&word);
		let overflows = current.syllables + syllables > window.max;

		if overflows && !current.is_empty() && current.syllables >= window.min {
			lines.push(current.finish(Some(window)));
			window = next_window();
		}
		current.push(word, syllables);
	}

	if !current.is_empty() {
		lines.push(current.finish(Some(window)));
	}
	lines
}

fn pack_by_count<F>(words: Vec<String>, mut next_len: F) -> PoemLines
where
	F: FnMut() -> usize,
{
	let mut lines = Vec::new();
	let mut words = words.into_iter().peekable();

	while words.peek().is_some() {
		let len = next_len().max(1);
		let mut current = LineBuilder::default();
		for word in words.by_ref().take(len) {
			let syllables = estimate_syllables(&word);
			current.push(word, syllables);
		}
		lines.push(current.finish(None));
	}
	lines
}
