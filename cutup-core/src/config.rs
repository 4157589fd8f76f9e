use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::CutupError;

/// Inclusive range of retention fractions (`0.0 < min <= max <= 1.0`).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct KeepRange {
	pub min: f64,
	pub max: f64,
}

impl KeepRange {
	pub const fn new(min: f64, max: f64) -> Self {
		Self { min, max }
	}
}

/// Parameters of the length-biased retention model.
///
/// Texts at or below `short_threshold` characters use `short_range`,
/// texts at or above `long_threshold` use `long_range`, anything in between
/// is linearly interpolated.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RetentionConfig {
	pub short_range: KeepRange,
	pub long_range: KeepRange,
	pub short_threshold: usize,
	pub long_threshold: usize,
}

/// How sampled words are grouped into lines.
///
/// The syllable policies (`Fixed`, `Bounded`, `Windowed`) rely on the
/// syllable estimator, the word policies only count words.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BudgetPolicy {
	/// One syllable ceiling shared by every line.
	Fixed { syllables: usize },

	/// One static `[min, max]` syllable window shared by every line.
	Bounded { min: usize, max: usize },

	/// A fresh `[min, max]` window drawn for each line from scaled and
	/// jittered base bounds.
	Windowed {
		base_min: usize,
		base_max: usize,
		multiplier_min: f64,
		multiplier_max: f64,
	},

	/// Exactly `words` words per line (the last line may be shorter).
	FixedWords { words: usize },

	/// A word count drawn uniformly from `[min, max]` for each line.
	RandomWords { min: usize, max: usize },
}

/// Final output representation.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
	#[default]
	Plain,
	Flicker,
}

impl FromStr for OutputMode {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"plain" | "text" => Ok(OutputMode::Plain),
			"flicker" | "html" => Ok(OutputMode::Flicker),
			other => Err(format!("Unknown output mode '{other}', expected 'plain' or 'flicker'")),
		}
	}
}

/// Timing ranges used when building flicker metadata.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct FlickerConfig {
	/// Toggle interval range in milliseconds.
	pub interval_ms: (f64, f64),
	/// Animation delay added per word position, in seconds.
	pub stagger_secs: f64,
	/// Line spacing multiplier range.
	pub line_spacing: (f64, f64),
}

impl Default for FlickerConfig {
	fn default() -> Self {
		Self {
			interval_ms: (2000.0, 4000.0),
			stagger_secs: 0.2,
			line_spacing: (0.3, 0.5),
		}
	}
}

/// Complete configuration of one pipeline run.
///
/// Deserializable from TOML. Missing fields take the `gentle` preset values.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CutupConfig {
	/// Keep `0-9` in the normalized text.
	pub keep_digits: bool,
	/// Bypasses the retention model when set. Must be in `(0, 1]`.
	pub fixed_retention: Option<f64>,
	pub retention: RetentionConfig,
	pub budget: BudgetPolicy,
	pub output: OutputMode,
	pub flicker: FlickerConfig,
}

impl Default for CutupConfig {
	fn default() -> Self {
		Preset::Gentle.config()
	}
}

impl CutupConfig {
	/// Loads a configuration from a TOML file and validates it.
	///
	/// # Errors
	/// - `Io` if the file cannot be read
	/// - `Config` if the TOML is malformed
	/// - `InvalidConfiguration` if a value is out of range
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CutupError> {
		let path = path.as_ref();
		let contents = fs::read_to_string(path)?;
		let config: CutupConfig = toml::from_str(&contents)?;
		config.validate()?;
		info!(path = %path.display(), "Loaded configuration");
		debug!(?config, "Active configuration");
		Ok(config)
	}

	/// Checks every value for consistency.
	///
	/// # Errors
	/// Returns `InvalidConfiguration` naming the first offending field.
	pub fn validate(&self) -> Result<(), CutupError> {
		if let Some(fixed) = self.fixed_retention {
			validate_fraction("fixed_retention", fixed)?;
		}
		self.retention.validate()?;
		self.budget.validate()?;

		let flicker = &self.flicker;
		let (interval_min, interval_max) = flicker.interval_ms;
		if !(interval_min > 0.0 && interval_min <= interval_max && interval_max.is_finite()) {
			return Err(CutupError::invalid(format!(
				"flicker.interval_ms must be finite with 0 < min <= max, got {:?}",
				flicker.interval_ms
			)));
		}
		let (spacing_min, spacing_max) = flicker.line_spacing;
		if !(spacing_min >= 0.0 && spacing_min <= spacing_max && spacing_max.is_finite()) {
			return Err(CutupError::invalid(format!(
				"flicker.line_spacing must be finite with 0 <= min <= max, got {:?}",
				flicker.line_spacing
			)));
		}
		if !(flicker.stagger_secs >= 0.0 && flicker.stagger_secs.is_finite()) {
			return Err(CutupError::invalid("flicker.stagger_secs must be finite and >= 0"));
		}
		Ok(())
	}
}

impl RetentionConfig {
	fn validate(&self) -> Result<(), CutupError> {
		validate_range("retention.short_range", self.short_range)?;
		validate_range("retention.long_range", self.long_range)?;
		if self.long_threshold <= self.short_threshold {
			return Err(CutupError::invalid(format!(
				"retention.long_threshold ({}) must be greater than short_threshold ({})",
				self.long_threshold, self.short_threshold
			)));
		}
		Ok(())
	}
}

impl BudgetPolicy {
	pub(crate) fn validate(&self) -> Result<(), CutupError> {
		match *self {
			BudgetPolicy::Fixed { syllables } if syllables == 0 => {
				Err(CutupError::invalid("budget.syllables must be >= 1"))
			}
			BudgetPolicy::Bounded { min, max } if min > max || max == 0 => {
				Err(CutupError::invalid(format!("budget window [{min}, {max}] is malformed")))
			}
			BudgetPolicy::Windowed { base_min, base_max, multiplier_min, multiplier_max } => {
				if base_min == 0 || base_min > base_max {
					return Err(CutupError::invalid(format!(
						"budget base window [{base_min}, {base_max}] is malformed"
					)));
				}
				if !(multiplier_min > 0.0 && multiplier_min <= multiplier_max && multiplier_max.is_finite()) {
					return Err(CutupError::invalid(format!(
						"budget multiplier range [{multiplier_min}, {multiplier_max}] is malformed"
					)));
				}
				Ok(())
			}
			BudgetPolicy::FixedWords { words } if words == 0 => {
				Err(CutupError::invalid("budget.words must be >= 1"))
			}
			BudgetPolicy::RandomWords { min, max } if min == 0 || min > max => {
				Err(CutupError::invalid(format!("budget word range [{min}, {max}] is malformed")))
			}
			_ => Ok(()),
		}
	}
}

fn validate_fraction(name: &str, value: f64) -> Result<(), CutupError> {
	if value > 0.0 && value <= 1.0 {
		Ok(())
	} else {
		Err(CutupError::invalid(format!("{name} must be in (0, 1], got {value}")))
	}
}

fn validate_range(name: &str, range: KeepRange) -> Result<(), CutupError> {
	validate_fraction(name, range.min)?;
	validate_fraction(name, range.max)?;
	if range.min > range.max {
		return Err(CutupError::invalid(format!(
			"{name} min ({}) is greater than max ({})",
			range.min, range.max
		)));
	}
	Ok(())
}

/// Named configurations.
///
/// - `Gentle`: mild reduction, fixed 10-syllable lines, plain output.
/// - `Sparse`: heavy reduction, static 6-12 syllable window.
/// - `Aggressive`: 24-30% / 3-6% retention, per-line random windows, no digits,
///   flicker output.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
	#[default]
	Gentle,
	Sparse,
	Aggressive,
}

impl Preset {
	pub const ALL: [Preset; 3] = [Preset::Gentle, Preset::Sparse, Preset::Aggressive];

	pub fn name(&self) -> &'static str {
		match self {
			Preset::Gentle => "gentle",
			Preset::Sparse => "sparse",
			Preset::Aggressive => "aggressive",
		}
	}

	/// Builds the full configuration of this preset.
	pub fn config(&self) -> CutupConfig {
		let thresholds = (1_000, 20_000);
		match self {
			Preset::Gentle => CutupConfig {
				keep_digits: true,
				fixed_retention: None,
				retention: RetentionConfig {
					short_range: KeepRange::new(0.15, 0.30),
					long_range: KeepRange::new(0.01, 0.10),
					short_threshold: thresholds.0,
					long_threshold: thresholds.1,
				},
				budget: BudgetPolicy::Fixed { syllables: 10 },
				output: OutputMode::Plain,
				flicker: FlickerConfig::default(),
			},
			Preset::Sparse => CutupConfig {
				keep_digits: true,
				fixed_retention: None,
				retention: RetentionConfig {
					short_range: KeepRange::new(0.08, 0.10),
					long_range: KeepRange::new(0.01, 0.02),
					short_threshold: thresholds.0,
					long_threshold: thresholds.1,
				},
				budget: BudgetPolicy::Bounded { min: 6, max: 12 },
				output: OutputMode::Plain,
				flicker: FlickerConfig::default(),
			},
			Preset::Aggressive => CutupConfig {
				keep_digits: false,
				fixed_retention: None,
				retention: RetentionConfig {
					short_range: KeepRange::new(0.24, 0.30),
					long_range: KeepRange::new(0.03, 0.06),
					short_threshold: thresholds.0,
					long_threshold: thresholds.1,
				},
				budget: BudgetPolicy::Windowed {
					base_min: 6,
					base_max: 12,
					multiplier_min: 1.0,
					multiplier_max: 1.67,
				},
				output: OutputMode::Flicker,
				flicker: FlickerConfig::default(),
			},
		}
	}
}

impl fmt::Display for Preset {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Preset {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Preset::ALL
			.into_iter()
			.find(|preset| preset.name().eq_ignore_ascii_case(s.trim()))
			.ok_or_else(|| format!("Unknown preset '{s}', expected one of: gentle, sparse, aggressive"))
	}
}
