use rand::Rng;
use tracing::debug;

use crate::config::{KeepRange, RetentionConfig};
use crate::error::CutupError;

/// Linear interpolation between `a` (t = 0) and `b` (t = 1).
fn lerp(a: f64, b: f64, t: f64) -> f64 {
	a * (1.0 - t) + b * t
}

/// Position of `text_length` between the short and long thresholds, clamped to `[0, 1]`.
pub fn length_factor(text_length: usize, config: &RetentionConfig) -> f64 {
	let span = config.long_threshold as f64 - config.short_threshold as f64;
	if span <= 0.0 {
		return if text_length >= config.long_threshold { 1.0 } else { 0.0 };
	}
	let normalized = (text_length as f64 - config.short_threshold as f64) / span;
	normalized.clamp(0.0, 1.0)
}

/// Returns the interpolated keep range for a cleaned text of `text_length` characters.
///
/// Short texts get `short_range`, long texts `long_range`; the bounds slide
/// linearly in between.
pub fn retention_bounds(text_length: usize, config: &RetentionConfig) -> KeepRange {
	let factor = length_factor(text_length, config);
	KeepRange {
		min: lerp(config.short_range.min, config.long_range.min, factor),
		max: lerp(config.short_range.max, config.long_range.max, factor),
	}
}

/// Computes the fraction of words to keep.
///
/// # Parameters
/// - `text_length`: Length of the normalized text, in characters.
/// - `config`: Short/long keep ranges and thresholds.
/// - `fixed`: When set, returned as-is (after validation) and no random draw happens.
/// - `rng`: Random source for the uniform draw.
///
/// # Returns
/// A fraction drawn uniformly from [`retention_bounds`].
///
/// # Errors
/// Returns `InvalidConfiguration` if `fixed` is outside `(0, 1]`.
pub fn compute_retention<R: Rng + ?Sized>(
	text_length: usize,
	config: &RetentionConfig,
	fixed: Option<f64>,
	rng: &mut R,
) -> Result<f64, CutupError> {
	if let Some(fixed) = fixed {
		if !(fixed > 0.0 && fixed <= 1.0) {
			return Err(CutupError::invalid(format!("fixed retention must be in (0, 1], got {fixed}")));
		}
		return Ok(fixed);
	}

	let bounds = retention_bounds(text_length, config);
	let fraction = if bounds.min < bounds.max {
		rng.random_range(bounds.min..=bounds.max)
	} else {
		bounds.min
	};

	debug!(text_length, min = bounds.min, max = bounds.max, fraction, "Retention drawn");
	Ok(fraction)
}
