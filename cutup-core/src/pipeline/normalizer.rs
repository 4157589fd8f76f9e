use once_cell::sync::Lazy;
use regex::Regex;

static RE_OUTSIDE_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s]").unwrap());
static RE_OUTSIDE_ALPHA: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z\s]").unwrap());
static RE_WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Cleans raw source text.
///
/// - Lowercases every character
/// - Removes everything outside `a-z`, whitespace and (if `keep_digits`) `0-9`
/// - Collapses whitespace runs to a single space and trims both ends
///
/// Never fails; the result may be empty. Applying it twice gives the same
/// result as applying it once.
pub fn normalize(text: &str, keep_digits: bool) -> String {
	let lowered = text.to_lowercase();
	let filter = if keep_digits { &RE_OUTSIDE_ALNUM } else { &RE_OUTSIDE_ALPHA };
	let filtered = filter.replace_all(&lowered, "");
	RE_WHITESPACE_RUN.replace_all(&filtered, " ").trim().to_owned()
}

/// Splits normalized text into its word sequence (never yields empty tokens).
pub fn words(normalized: &str) -> Vec<String> {
	normalized.split_whitespace().map(str::to_owned).collect()
}
