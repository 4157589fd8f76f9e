use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tracing::debug;

/// Default pause between two characters.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(20);

/// Shared cancellation flag.
///
/// Clones observe the same flag, so one clone can be handed to a signal
/// handler while another is polled by the writer.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
	cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn cancel(&self) {
		self.cancelled.store(true, Ordering::Release);
	}

	pub fn is_cancelled(&self) -> bool {
		self.cancelled.load(Ordering::Acquire)
	}
}

/// Writes text one character at a time, flushing and sleeping after each.
///
/// Once the token is cancelled, the remaining characters are dropped: the
/// output is truncated, no error is raised.
pub struct ThrottledWriter<W: Write> {
	inner: W,
	delay: Duration,
	token: CancellationToken,
}

impl<W: Write> ThrottledWriter<W> {
	/// Creates a writer with its own cancellation token.
	/// A zero `delay` disables sleeping.
	pub fn new(inner: W, delay: Duration) -> Self {
		Self { inner, delay, token: CancellationToken::new() }
	}

	/// Replaces the cancellation token.
	pub fn with_token(mut self, token: CancellationToken) -> Self {
		self.token = token;
		self
	}

	pub fn token(&self) -> &CancellationToken {
		&self.token
	}

	/// Emits `text` character by character.
	///
	/// # Returns
	/// The number of characters actually written (less than the text length
	/// if cancelled midway).
	///
	/// # Errors
	/// Propagates errors of the underlying writer.
	pub fn write_text(&mut self, text: &str) -> io::Result<usize> {
		let mut written = 0;
		let mut buffer = [0u8; 4];

		for c in text.chars() {
			if self.token.is_cancelled() {
				debug!(written, "Throttled output cancelled");
				return Ok(written);
			}
			self.inner.write_all(c.encode_utf8(&mut buffer).as_bytes())?;
			self.inner.flush()?;
			if !self.delay.is_zero() {
				thread::sleep(self.delay);
			}
			written += 1;
		}

		Ok(written)
	}

	pub fn into_inner(self) -> W {
		self.inner
	}
}
