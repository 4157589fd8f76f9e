//! Cut-up poem generator - command-line front end.
//!
//! Reads one text file, a directory of `.txt` files, or every `.txt` file in
//! the current directory, turns each into a cut-up poem and saves it under a
//! title made of random source words.

mod html;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cutup_core::batch::{BatchJob, BatchResult, run_batch};
use cutup_core::io::{get_filename, list_files, normalize_folder, read_file, title_filename, write_file};
use cutup_core::pipeline::formatter::write_plain;
use cutup_core::pipeline::normalizer::{normalize, words};
use cutup_core::stream::{CancellationToken, ThrottledWriter};
use cutup_core::{CutUp, CutupConfig, CutupError, Output, OutputMode, Poem, Preset};

/// Create 'cut-up' poems from source text files.
///
/// Words are cleaned, randomly sampled (longer texts keep fewer words) and
/// re-lineated by syllable count.
#[derive(Parser, Debug)]
#[command(name = "cutup")]
#[command(version)]
#[command(about = "Create 'cut-up' poems from source text files")]
struct Cli {
	/// Input .txt file or directory containing .txt files
	input: Option<PathBuf>,

	/// Process all .txt files in the current directory
	#[arg(short, long, conflicts_with = "input")]
	all: bool,

	/// Directory to save output files (default: current directory)
	#[arg(short, long)]
	output_dir: Option<PathBuf>,

	/// Fixed fraction of words to keep, in (0, 1]
	/// Without it, retention is drawn from the preset's length-biased range
	#[arg(short, long)]
	keep: Option<f64>,

	/// Named configuration: gentle, sparse or aggressive
	#[arg(long, default_value = "gentle")]
	preset: Preset,

	/// TOML configuration file (replaces the preset)
	#[arg(long)]
	config: Option<PathBuf>,

	/// Output format override: plain (.txt) or flicker (.html)
	#[arg(long)]
	format: Option<OutputMode>,

	/// Seed for reproducible poems
	#[arg(long)]
	seed: Option<u64>,

	/// Delay between characters when printing a single poem, in milliseconds
	#[arg(long, default_value_t = 20)]
	delay_ms: u64,

	/// Do not print the poem, only write the output file
	#[arg(short, long)]
	quiet: bool,
}

fn main() {
	init_tracing();
	if let Err(err) = run(Cli::parse()) {
		error!("{err:?}");
		eprintln!("Error: {err:#}");
		std::process::exit(1);
	}
}

fn init_tracing() {
	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
	tracing_subscriber::registry()
		.with(fmt::layer().with_target(true).with_writer(std::io::stderr).with_filter(env_filter))
		.init();
}

fn run(cli: Cli) -> Result<()> {
	let cutup = build_cutup(&cli)?;
	let files = collect_inputs(&cli)?;
	let seed = cli.seed.unwrap_or_else(|| rand::rng().random());
	info!(files = files.len(), seed, "Starting cut-up");

	match cutup.config().fixed_retention {
		Some(keep) => println!("Processing {} file(s) with fixed {:.1}% word retention...", files.len(), keep * 100.0),
		None => println!("Processing {} file(s) with biased random retention...", files.len()),
	}
	println!("{}", "-".repeat(50));

	let mut failures = 0;
	let mut jobs = Vec::new();
	for path in &files {
		match read_file(path) {
			Ok(text) => jobs.push(BatchJob { name: path.display().to_string(), text }),
			Err(err) => {
				println!("Error: could not read '{}': {err}", path.display());
				failures += 1;
			}
		}
	}

	let interactive = jobs.len() == 1 && !cli.quiet && cutup.config().output == OutputMode::Plain;
	let submitted = jobs.len();
	let results = run_batch(jobs, &cutup, seed);
	if results.len() < submitted {
		println!("Error: {} file(s) were lost while processing.", submitted - results.len());
		failures += submitted - results.len();
	}

	for result in results {
		let BatchResult { name, text, seed, result, .. } = result;
		match result {
			Ok((poem, output)) => {
				if interactive {
					display(&text, &poem, Duration::from_millis(cli.delay_ms))?;
				}
				save(&cli, &cutup, &name, &text, seed, &poem, &output)?;
			}
			Err(CutupError::EmptyInput) => {
				println!("Warning: '{name}' had no words after cleaning.");
				failures += 1;
			}
			Err(err) => return Err(err).with_context(|| format!("Failed to process '{name}'")),
		}
	}

	println!("{}", "-".repeat(50));
	if failures > 0 {
		bail!("{failures} of {} file(s) could not be processed", files.len());
	}
	println!("Done!");
	Ok(())
}

/// Resolves the configuration from the config file or preset, then applies overrides.
fn build_cutup(cli: &Cli) -> Result<CutUp> {
	let mut config = match &cli.config {
		Some(path) => CutupConfig::load(path)
			.with_context(|| format!("Failed to load config '{}'", path.display()))?,
		None => cli.preset.config(),
	};
	if let Some(keep) = cli.keep {
		config.fixed_retention = Some(keep);
	}
	if let Some(format) = cli.format {
		config.output = format;
	}
	CutUp::new(config).context("Invalid configuration")
}

/// Expands the CLI input into the list of files to process.
fn collect_inputs(cli: &Cli) -> Result<Vec<PathBuf>> {
	if cli.all {
		let files = list_files(normalize_folder("."), "txt").context("Failed to list current directory")?;
		if files.is_empty() {
			bail!("No .txt files found in current directory.");
		}
		return Ok(files);
	}

	let Some(input) = &cli.input else {
		bail!("You must specify an input file/directory or use --all to process all .txt files in the current directory.");
	};

	if input.is_file() {
		if input.extension().is_none_or(|ext| ext != "txt") {
			warn!(path = %input.display(), "Input is not a .txt file, processing anyway");
		}
		Ok(vec![input.clone()])
	} else if input.is_dir() {
		let files = list_files(input, "txt")
			.with_context(|| format!("Failed to list directory '{}'", input.display()))?;
		if files.is_empty() {
			bail!("No .txt files found in directory '{}'.", input.display());
		}
		Ok(files)
	} else {
		bail!("'{}' is not a valid file or directory.", input.display());
	}
}

/// Prints the source, then the poem one character at a time.
/// Ctrl-C cuts the slow print short.
fn display(source: &str, poem: &Poem, delay: Duration) -> Result<()> {
	println!("--- Original Text ---");
	println!("{source}");
	println!("\n{}\n", "=".repeat(30));
	println!("--- Reduced & Cleaned Text ({:.0}% reduction) ---", poem.reduction_percent());

	let token = CancellationToken::new();
	let handler_token = token.clone();
	if let Err(err) = ctrlc::set_handler(move || handler_token.cancel()) {
		warn!("Could not install Ctrl-C handler: {err}");
	}

	let mut out = ThrottledWriter::new(std::io::stdout(), delay).with_token(token);
	write_plain(&poem.lines, &mut out).context("Failed to print poem")?;
	println!();
	Ok(())
}

/// Writes the rendered poem as `<title>.txt` or `<title>.html`.
fn save(
	cli: &Cli,
	cutup: &CutUp,
	name: &str,
	source: &str,
	seed: u64,
	poem: &Poem,
	output: &Output,
) -> Result<PathBuf> {
	let (contents, extension) = match output {
		Output::Plain(text) => (text.clone(), "txt"),
		Output::Flicker(flicker) => (html::render_page(flicker), "html"),
	};

	let cleaned_words = words(&normalize(source, cutup.config().keep_digits));
	let fallback = get_filename(name).unwrap_or_else(|_| "poem_output".to_owned());
	let mut rng = StdRng::seed_from_u64(seed);
	let filename = title_filename(&cleaned_words, &fallback, extension, &mut rng);

	let path = match &cli.output_dir {
		Some(dir) => dir.join(filename),
		None => Path::new(&filename).to_path_buf(),
	};
	write_file(&path, &contents).with_context(|| format!("Failed to write '{}'", path.display()))?;

	println!(
		"Created: {} ({} lines, {:.0}% reduction)",
		path.display(),
		poem.lines.len(),
		poem.reduction_percent()
	);
	Ok(path)
}
