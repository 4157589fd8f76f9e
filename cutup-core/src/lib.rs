//! Cut-up poetry text transformation library.
//!
//! This crate turns arbitrary source text into a "cut-up" poem:
//! - Text normalization (lowercase, restricted alphabet, collapsed whitespace)
//! - Length-biased random word retention
//! - Unordered random word sampling
//! - Syllable-budgeted line packing
//! - Plain or flicker (obfuscated) output formatting
//!
//! Every random draw goes through a caller-supplied `rand::Rng`, so a seeded
//! generator makes a run fully reproducible.

/// Reduction-and-lineation pipeline stages and the `CutUp` facade.
pub mod pipeline;

/// Pipeline configuration and named presets.
pub mod config;

/// Error type shared by the whole crate.
pub mod error;

/// File helpers used by the front ends (reading, listing, output naming).
pub mod io;

/// Throttled, cancellable character-by-character output.
pub mod stream;

/// Parallel processing of many independent sources.
pub mod batch;

pub use config::{BudgetPolicy, CutupConfig, KeepRange, OutputMode, Preset};
pub use error::CutupError;
pub use pipeline::cutup::{CutUp, Output, Poem};
