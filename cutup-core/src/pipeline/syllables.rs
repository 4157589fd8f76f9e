/// Characters treated as vowels when counting syllables.
const VOWELS: [char; 6] = ['a', 'e', 'i', 'o', 'u', 'y'];

fn is_vowel(c: char) -> bool {
	VOWELS.contains(&c)
}

/// Estimates the number of syllables in a single word.
///
/// This is a heuristic, not a dictionary lookup:
/// 1. The word is lowercased and trimmed.
/// 2. Words without any `a-z` character count as 0.
/// 3. Words of at most 3 characters count as 1.
/// 4. A trailing `e` is dropped, except in a consonant + `le` ending
///    ("table", "apple").
/// 5. Each run of consecutive vowels (`aeiouy`) counts as one syllable.
/// 6. A word with no vowel run still counts as 1.
pub fn estimate_syllables(word: &str) -> usize {
	let word = word.trim().to_lowercase();

	if !word.chars().any(|c| c.is_ascii_lowercase()) {
		return 0;
	}

	let mut chars: Vec<char> = word.chars().collect();
	if chars.len() <= 3 {
		return 1;
	}

	if chars.last() == Some(&'e') {
		let consonant_le = chars.len() >= 3
			&& chars[chars.len() - 2] == 'l'
			&& !is_vowel(chars[chars.len() - 3]);
		if !consonant_le {
			chars.pop();
		}
	}

	let mut groups = 0;
	let mut in_group = false;
	for c in chars {
		let vowel = is_vowel(c);
		if vowel && !in_group {
			groups += 1;
		}
		in_group = vowel;
	}

	groups.max(1)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn short_words_are_one_syllable() {
		assert_eq!(estimate_syllables("a"), 1);
		assert_eq!(estimate_syllables("the"), 1);
		assert_eq!(estimate_syllables("fly"), 1);
		assert_eq!(estimate_syllables("zzz"), 1);
	}

	#[test]
	fn empty_and_non_alphabetic_words_are_zero() {
		assert_eq!(estimate_syllables(""), 0);
		assert_eq!(estimate_syllables("   "), 0);
		assert_eq!(estimate_syllables("1984"), 0);
	}

	#[test]
	fn consonant_le_keeps_its_syllable() {
		assert_eq!(estimate_syllables("table"), 2);
		assert_eq!(estimate_syllables("apple"), 2);
		assert_eq!(estimate_syllables("little"), 2);
	}

	#[test]
	fn silent_e_is_dropped() {
		assert_eq!(estimate_syllables("like"), 1);
		assert_eq!(estimate_syllables("whale"), 1);
		assert_eq!(estimate_syllables("stone"), 1);
		assert_eq!(estimate_syllables("queue"), 1);
	}

	#[test]
	fn counts_vowel_groups() {
		assert_eq!(estimate_syllables("beautiful"), 3);
		assert_eq!(estimate_syllables("rhythm"), 1);
		assert_eq!(estimate_syllables("quick"), 1);
		assert_eq!(estimate_syllables("jumps"), 1);
		assert_eq!(estimate_syllables("over"), 2);
		assert_eq!(estimate_syllables("lazy"), 2);
		assert_eq!(estimate_syllables("Everything"), 4);
	}

	#[test]
	fn vowelless_words_floor_at_one() {
		assert_eq!(estimate_syllables("crwth"), 1);
		assert_eq!(estimate_syllables("brrrr"), 1);
	}

	#[test]
	fn input_is_trimmed_and_lowercased() {
		assert_eq!(estimate_syllables("  TABLE "), 2);
	}
}
