use std::mem;

use rand::Rng;
use rand::seq::index;

/// Number of words kept from a sequence of `len` words at `fraction`.
///
/// `max(1, floor(len * fraction))`, capped at `len`; 0 only when `len` is 0.
pub fn sample_size(len: usize, fraction: f64) -> usize {
	if len == 0 {
		return 0;
	}
	let k = (len as f64 * fraction).floor();
	if k.is_nan() || k < 1.0 {
		1
	} else {
		(k as usize).min(len)
	}
}

/// Draws `sample_size(words.len(), fraction)` distinct positions uniformly
/// without replacement and returns the words at those positions.
///
/// The returned order is itself random, not the source order.
/// An empty input yields an empty output.
pub fn sample<R: Rng + ?Sized>(mut words: Vec<String>, fraction: f64, rng: &mut R) -> Vec<String> {
	let k = sample_size(words.len(), fraction);
	if k == 0 {
		return Vec::new();
	}

	// Positions are distinct, so each slot is taken exactly once.
	index::sample(rng, words.len(), k)
		.into_iter()
		.map(|i| mem::take(&mut words[i]))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn words(text: &str) -> Vec<String> {
		text.split_whitespace().map(str::to_owned).collect()
	}

	fn sorted(mut v: Vec<String>) -> Vec<String> {
		v.sort();
		v
	}

	#[test]
	fn sample_size_rules() {
		assert_eq!(sample_size(0, 0.5), 0);
		assert_eq!(sample_size(10, 0.01), 1);
		assert_eq!(sample_size(10, 0.25), 2);
		assert_eq!(sample_size(10, 1.0), 10);
		assert_eq!(sample_size(3, 0.999), 2);
		assert_eq!(sample_size(7, 2.0), 7);
	}

	#[test]
	fn empty_input_gives_empty_sample() {
		let mut rng = StdRng::seed_from_u64(0);
		assert!(sample(Vec::new(), 0.5, &mut rng).is_empty());
	}

	#[test]
	fn sample_has_requested_size_and_no_fabricated_words() {
		let source = words("a b c d e f g h i j k l m n o p q r s t the the the");
		let mut rng = StdRng::seed_from_u64(99);
		for fraction in [0.01, 0.1, 0.33, 0.5, 0.9, 1.0] {
			let picked = sample(source.clone(), fraction, &mut rng);
			assert_eq!(picked.len(), sample_size(source.len(), fraction));

			let mut pool = source.clone();
			for word in &picked {
				let at = pool.iter().position(|w| w == word).expect("word not in source");
				pool.swap_remove(at);
			}
		}
	}

	#[test]
	fn full_retention_is_a_permutation() {
		let source = words("the quick brown fox jumps over the lazy dog");
		let mut rng = StdRng::seed_from_u64(5);
		let picked = sample(source.clone(), 1.0, &mut rng);
		assert_eq!(sorted(picked), sorted(source));
	}

	#[test]
	fn order_is_shuffled() {
		let source: Vec<String> = (0..50).map(|i| i.to_string()).collect();
		let mut rng = StdRng::seed_from_u64(11);
		let reordered = (0..10).any(|_| sample(source.clone(), 1.0, &mut rng) != source);
		assert!(reordered);
	}

	#[test]
	fn same_seed_same_sample() {
		let source = words("one two three four five six seven eight nine ten");
		let a = sample(source.clone(), 0.5, &mut StdRng::seed_from_u64(2024));
		let b = sample(source, 0.5, &mut StdRng::seed_from_u64(2024));
		assert_eq!(a, b);
	}
}
