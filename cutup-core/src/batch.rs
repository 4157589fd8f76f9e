use std::sync::mpsc;
use std::thread;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::error::CutupError;
use crate::pipeline::cutup::{CutUp, Output, Poem};

/// One source to transform.
#[derive(Clone, Debug)]
pub struct BatchJob {
	/// Caller-chosen identifier (typically the file name).
	pub name: String,
	pub text: String,
}

/// Outcome of one job.
#[derive(Debug)]
pub struct BatchResult {
	/// Position of the job in the submitted list.
	pub index: usize,
	pub name: String,
	/// The job's source text, handed back so callers never pair by position.
	pub text: String,
	/// Seed of the job's private random source.
	pub seed: u64,
	pub result: Result<(Poem, Output), CutupError>,
}

/// Transforms many sources in parallel.
///
/// # Parameters
/// - `jobs`: Sources to process.
/// - `cutup`: Transformer shared (cloned) by every worker.
/// - `base_seed`: Job `i` runs with `StdRng::seed_from_u64(base_seed + i)`.
///
/// # Returns
/// One `BatchResult` per completed job, in job order. Each result carries its
/// job index and source text. A worker that panics loses the rest of its
/// chunk: callers compare the result count with the job count.
///
/// # Behavior
/// - Splits jobs into chunks (based on CPU cores * factor).
/// - Spawns one thread per chunk.
/// - Collects results over an MPSC channel and restores job order.
///
/// # Notes
/// Runs are independent; the output of a job only depends on its text,
/// the configuration and its seed, not on scheduling.
pub fn run_batch(jobs: Vec<BatchJob>, cutup: &CutUp, base_seed: u64) -> Vec<BatchResult> {
	if jobs.is_empty() {
		return Vec::new();
	}

	let job_count = jobs.len();
	let cpus = num_cpus::get();
	let factor = 8;
	let chunks = cpus * factor;
	let chunk_size = job_count.div_ceil(chunks);

	let (tx, rx) = mpsc::channel();
	let mut pending = jobs.into_iter().enumerate();
	loop {
		let chunk: Vec<(usize, BatchJob)> = pending.by_ref().take(chunk_size).collect();
		if chunk.is_empty() {
			break;
		}
		let tx = tx.clone();
		let cutup = cutup.clone();

		thread::spawn(move || {
			for (index, job) in chunk {
				let seed = base_seed.wrapping_add(index as u64);
				let mut rng = StdRng::seed_from_u64(seed);
				let result = cutup.run(&job.text, &mut rng).map(|poem| {
					let output = cutup.render(&poem, &mut rng);
					(poem, output)
				});
				debug!(name = %job.name, seed, ok = result.is_ok(), "Batch job finished");
				let BatchJob { name, text } = job;
				if tx.send(BatchResult { index, name, text, seed, result }).is_err() {
					return;
				}
			}
		});
	}
	drop(tx);

	let mut results: Vec<BatchResult> = rx.iter().collect();
	results.sort_by_key(|result| result.index);
	if results.len() < job_count {
		warn!(jobs = job_count, completed = results.len(), "Some batch jobs were lost");
	} else {
		info!(jobs = job_count, completed = results.len(), "Batch finished");
	}

	results
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::Preset;

	fn job(name: &str, text: &str) -> BatchJob {
		BatchJob { name: name.to_owned(), text: text.to_owned() }
	}

	#[test]
	fn results_keep_job_order() {
		let jobs: Vec<BatchJob> = (0..40)
			.map(|i| job(&format!("text{i}"), "the sea the salt the lamp the wind and the tide turning"))
			.collect();
		let results = run_batch(jobs, &CutUp::from_preset(Preset::Gentle), 100);

		assert_eq!(results.len(), 40);
		for (i, result) in results.iter().enumerate() {
			assert_eq!(result.index, i);
			assert_eq!(result.name, format!("text{i}"));
			assert_eq!(result.seed, 100 + i as u64);
			assert!(result.result.is_ok());
		}
	}

	#[test]
	fn empty_sources_are_reported_per_job() {
		let jobs = vec![job("full", "words are here"), job("empty", "?!"), job("also", "more words")];
		let results = run_batch(jobs, &CutUp::from_preset(Preset::Gentle), 0);

		assert!(results[0].result.is_ok());
		assert!(matches!(results[1].result, Err(CutupError::EmptyInput)));
		assert!(results[2].result.is_ok());
	}

	#[test]
	fn batch_matches_sequential_runs() {
		let cutup = CutUp::from_preset(Preset::Aggressive);
		let text = "a long walk through a quiet forest where every branch remembers the rain";
		let results = run_batch(vec![job("a", text), job("b", text)], &cutup, 7);

		for (i, result) in results.iter().enumerate() {
			let mut rng = StdRng::seed_from_u64(7 + i as u64);
			let expected = cutup.run(text, &mut rng).unwrap();
			let (poem, _) = result.result.as_ref().unwrap();
			assert_eq!(poem, &expected);
		}
	}

	#[test]
	fn results_carry_their_own_source() {
		let jobs = vec![job("a", "first text here"), job("b", "?!"), job("c", "third one")];
		let results = run_batch(jobs.clone(), &CutUp::from_preset(Preset::Gentle), 5);

		for (result, job) in results.iter().zip(&jobs) {
			assert_eq!(result.name, job.name);
			assert_eq!(result.text, job.text);
		}
		assert!(results[1].result.is_err());
	}

	#[test]
	fn no_jobs_no_results() {
		assert!(run_batch(Vec::new(), &CutUp::from_preset(Preset::Gentle), 0).is_empty());
	}
}
