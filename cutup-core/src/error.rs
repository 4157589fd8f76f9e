use thiserror::Error;

/// Errors produced by the cut-up pipeline and its file helpers.
///
/// Only `EmptyInput` and `InvalidConfiguration` come from the transformation
/// itself. `Io` and `Config` are raised by the collaborator helpers in
/// [`crate::io`] and [`crate::config`].
#[derive(Error, Debug)]
pub enum CutupError {
	/// No word survived normalization.
	///
	/// Callers are expected to skip and report, not abort.
	#[error("source text has no words after cleaning")]
	EmptyInput,

	/// A configuration value is out of range or inconsistent.
	#[error("invalid configuration: {0}")]
	InvalidConfiguration(String),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("config file error: {0}")]
	Config(#[from] toml::de::Error),
}

impl CutupError {
	/// Shorthand for building an `InvalidConfiguration` error.
	pub(crate) fn invalid(message: impl Into<String>) -> Self {
		CutupError::InvalidConfiguration(message.into())
	}
}
