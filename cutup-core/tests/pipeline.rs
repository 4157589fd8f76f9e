//! End-to-end tests of the cut-up pipeline.

use cutup_core::config::{BudgetPolicy, CutupConfig, OutputMode, Preset};
use cutup_core::io::{list_files, read_file, title_filename, write_file};
use cutup_core::pipeline::formatter::{format_flicker, format_plain, reveal};
use cutup_core::pipeline::normalizer::{normalize, words};
use cutup_core::pipeline::packer::pack_lines;
use cutup_core::pipeline::sampler::sample;
use cutup_core::pipeline::syllables::estimate_syllables;
use cutup_core::{CutUp, CutupError, Output};
use rand::SeedableRng;
use rand::rngs::StdRng;

const FOX: &str = "the quick brown fox jumps over the lazy dog";

fn sorted(mut v: Vec<String>) -> Vec<String> {
	v.sort();
	v
}

/// Full retention and a 4-syllable budget keep every word exactly once.
#[test]
fn fox_with_full_retention() {
	let mut config = CutupConfig::default();
	config.fixed_retention = Some(1.0);
	config.budget = BudgetPolicy::Fixed { syllables: 4 };
	let cutup = CutUp::new(config).unwrap();

	let poem = cutup.run(FOX, &mut StdRng::seed_from_u64(2024)).unwrap();
	let again = cutup.run(FOX, &mut StdRng::seed_from_u64(2024)).unwrap();
	assert_eq!(poem, again);

	let all: Vec<String> = poem.lines.iter().flat_map(|line| line.words.clone()).collect();
	assert_eq!(all.len(), 9);
	assert_eq!(sorted(all), sorted(words(FOX)));

	for line in &poem.lines {
		let syllables: usize = line.words.iter().map(|w| estimate_syllables(w)).sum();
		assert_eq!(syllables, line.syllables);
		assert!(line.syllables <= 4);
	}
}

/// Empty input flows through every stage without failing.
#[test]
fn empty_input_through_each_stage() {
	let mut rng = StdRng::seed_from_u64(0);
	let cleaned = normalize("", true);
	assert_eq!(cleaned, "");

	let sampled = sample(words(&cleaned), 0.5, &mut rng);
	assert!(sampled.is_empty());

	let lines = pack_lines(sampled, &BudgetPolicy::Fixed { syllables: 10 }, &mut rng).unwrap();
	assert!(lines.is_empty());
	assert_eq!(format_plain(&lines), "");
	assert!(format_flicker(&lines, &CutupConfig::default().flicker, &mut rng).lines.is_empty());

	let cutup = CutUp::from_preset(Preset::Gentle);
	assert!(matches!(cutup.run("", &mut rng), Err(CutupError::EmptyInput)));
}

/// Word counts follow the retention fraction on a longer text.
#[test]
fn retention_controls_word_count() {
	let text = "Call me Ishmael. Some years ago, never mind how long precisely, having little \
	            or no money in my purse, and nothing particular to interest me on shore, I thought \
	            I would sail about a little and see the watery part of the world."
		.repeat(20);

	for fraction in [0.05, 0.2, 0.6] {
		let mut config = CutupConfig::default();
		config.fixed_retention = Some(fraction);
		let cutup = CutUp::new(config).unwrap();
		let poem = cutup.run(&text, &mut StdRng::seed_from_u64(1)).unwrap();
		let expected = ((poem.source_words as f64) * fraction).floor() as usize;
		assert_eq!(poem.word_count(), expected.max(1));
	}
}

/// Every output word comes from the cleaned source.
#[test]
fn presets_only_emit_source_words() {
	let text = "O Romeo, Romeo! wherefore art thou Romeo? Deny thy father and refuse thy name; \
	            Or, if thou wilt not, be but sworn my love, And I'll no longer be a Capulet.";
	let source = words(&normalize(text, true));

	for preset in Preset::ALL {
		let cutup = CutUp::from_preset(preset);
		for seed in 0..20 {
			let mut rng = StdRng::seed_from_u64(seed);
			let poem = cutup.run(text, &mut rng).unwrap();
			assert!(poem.word_count() >= 1);
			for line in &poem.lines {
				assert!(!line.words.is_empty());
				assert!(line.words.iter().all(|w| source.contains(w)));
			}
		}
	}
}

#[test]
fn flicker_output_hides_and_reveals_words() {
	let cutup = CutUp::from_preset(Preset::Aggressive);
	assert_eq!(cutup.config().output, OutputMode::Flicker);

	let output = cutup
		.transform("Tyger Tyger, burning bright, In the forests of the night", &mut StdRng::seed_from_u64(5))
		.unwrap();
	let Output::Flicker(poem) = output else {
		panic!("aggressive preset renders flicker output");
	};
	for (index, line) in poem.lines.iter().enumerate() {
		for word in &line.words {
			assert_eq!(reveal(&word.obfuscated).as_deref(), Some(word.original.as_str()));
			assert_eq!(word.starts_plain, index % 2 == 0);
		}
	}
}

#[test]
fn config_file_round_trip() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("cutup.toml");
	write_file(
		&path,
		r#"
keep_digits = false
fixed_retention = 0.5

[budget]
mode = "random_words"
min = 3
max = 7
"#,
	)
	.unwrap();

	let config = CutupConfig::load(&path).unwrap();
	assert_eq!(config.fixed_retention, Some(0.5));
	assert_eq!(config.budget, BudgetPolicy::RandomWords { min: 3, max: 7 });

	write_file(&path, "fixed_retention = 3.0").unwrap();
	assert!(matches!(CutupConfig::load(&path), Err(CutupError::InvalidConfiguration(_))));

	write_file(&path, "fixed_retention = [").unwrap();
	assert!(matches!(CutupConfig::load(&path), Err(CutupError::Config(_))));

	assert!(matches!(CutupConfig::load(dir.path().join("missing.toml")), Err(CutupError::Io(_))));
}

#[test]
fn file_helpers() {
	let dir = tempfile::tempdir().unwrap();
	write_file(dir.path().join("b.txt"), "second").unwrap();
	write_file(dir.path().join("a.txt"), "first").unwrap();
	write_file(dir.path().join("notes.md"), "ignored").unwrap();
	write_file(dir.path().join("nested/c.txt"), "nested").unwrap();

	let files = list_files(dir.path(), "txt").unwrap();
	assert_eq!(files, [dir.path().join("a.txt"), dir.path().join("b.txt")]);
	assert_eq!(read_file(&files[0]).unwrap(), "first");

	let name = title_filename(&words("lamp"), "a", "txt", &mut StdRng::seed_from_u64(0));
	assert_eq!(name, "lamp.txt");
}
