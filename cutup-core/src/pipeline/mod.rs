//! Top-level module for the reduction-and-lineation pipeline.
//!
//! Stages, leaf-first:
//! - Text normalization (`normalizer`)
//! - Syllable estimation (`syllables`)
//! - Length-biased retention (`retention`)
//! - Random word sampling (`sampler`)
//! - Line packing (`packer`)
//! - Output formatting (`formatter`)
//!
//! `cutup::CutUp` chains all of them.

/// Lowercasing, alphabet filtering and whitespace collapsing.
pub mod normalizer;

/// Heuristic vowel-group syllable counter.
pub mod syllables;

/// Retention fraction computed from the cleaned text length.
pub mod retention;

/// Unordered sampling without replacement.
///
/// The output order is random, which is what produces the cut-up effect.
pub mod sampler;

/// Greedy grouping of sampled words into lines under a budget policy.
pub mod packer;

/// Plain text and flicker (plain/obfuscated) renderings of a poem.
pub mod formatter;

/// High-level facade running every stage from a single configuration.
pub mod cutup;
