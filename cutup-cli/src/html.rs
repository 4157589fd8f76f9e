//! Standalone HTML page for flicker poems.
//!
//! Each word becomes a `<span>` carrying both of its representations. A small
//! script swaps them on the word's own interval, after its staggered delay.

use cutup_core::pipeline::formatter::{FlickerLine, FlickerPoem, FlickerWord};

const STYLE: &str = r#"
body {
	background: #000;
	color: #f5f5f5;
	font-family: "Courier New", monospace;
	display: flex;
	justify-content: center;
	align-items: center;
	min-height: 100vh;
	margin: 0;
}
.poem {
	max-width: 60ch;
	padding: 2em;
	text-align: center;
}
.line {
	margin: var(--line-margin) 0;
	line-height: var(--line-height);
}
.word {
	display: inline-block;
	margin: 0 0.25em;
	transition: opacity 0.3s ease-in-out;
}
"#;

const SCRIPT: &str = r#"
document.querySelectorAll('.word').forEach(function (word) {
	var delay = parseFloat(word.dataset.delay) * 1000;
	var interval = parseFloat(word.dataset.interval);
	var showingPlain = word.dataset.start === 'plain';
	function swap() {
		showingPlain = !showingPlain;
		word.style.opacity = 0;
		setTimeout(function () {
			word.textContent = showingPlain ? word.dataset.plain : word.dataset.hidden;
			word.style.opacity = 1;
		}, 150);
	}
	setTimeout(function () {
		setInterval(swap, interval);
	}, delay);
});
"#;

/// Renders a complete HTML document for a flicker poem.
///
/// The page is self-contained: no external stylesheet, script or font.
/// Line spacing is derived from the poem's `line_spacing` multiplier.
pub fn render_page(poem: &FlickerPoem) -> String {
	let line_margin = poem.line_spacing * 0.5;
	let line_height = (poem.line_spacing * 0.8).max(1.0);
	let body: String = poem.lines.iter().map(render_line).collect();

	format!(
		"<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>cut-up</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<div class=\"poem\" style=\"--line-margin: {line_margin:.2}em; --line-height: {line_height:.2};\">\n{body}</div>\n<script>{SCRIPT}</script>\n</body>\n</html>\n"
	)
}

fn render_line(line: &FlickerLine) -> String {
	let words: Vec<String> = line.words.iter().map(render_word).collect();
	format!("<div class=\"line\">{}</div>\n", words.join(" "))
}

fn render_word(word: &FlickerWord) -> String {
	format!(
		"<span class=\"word\" data-plain=\"{}\" data-hidden=\"{}\" data-start=\"{}\" data-delay=\"{:.1}\" data-interval=\"{:.0}\">{}</span>",
		escape(&word.original),
		escape(&word.obfuscated),
		if word.starts_plain { "plain" } else { "hidden" },
		word.delay_secs,
		word.interval_ms,
		escape(word.initial()),
	)
}

/// Escapes text for use inside element content and quoted attributes.
fn escape(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#39;"),
			_ => escaped.push(c),
		}
	}
	escaped
}

#[cfg(test)]
mod tests {
	use super::*;
	use cutup_core::pipeline::formatter::FlickerDirection;

	fn word(original: &str, obfuscated: &str, starts_plain: bool, delay_secs: f64) -> FlickerWord {
		FlickerWord {
			original: original.to_owned(),
			obfuscated: obfuscated.to_owned(),
			starts_plain,
			delay_secs,
			interval_ms: 2500.0,
		}
	}

	fn poem() -> FlickerPoem {
		FlickerPoem {
			lines: vec![
				FlickerLine {
					direction: FlickerDirection::Forward,
					words: vec![word("lazy", "bGF6eQ", true, 0.0), word("dog", "ZG9n", true, 0.2)],
				},
				FlickerLine {
					direction: FlickerDirection::Reverse,
					words: vec![word("fox", "Zm94", false, 0.0)],
				},
			],
			line_spacing: 0.4,
		}
	}

	#[test]
	fn page_contains_every_word_and_timing() {
		let page = render_page(&poem());

		assert!(page.starts_with("<!DOCTYPE html>"));
		assert_eq!(page.matches("class=\"line\"").count(), 2);
		assert_eq!(page.matches("class=\"word\"").count(), 3);
		assert!(page.contains("data-plain=\"dog\" data-hidden=\"ZG9n\" data-start=\"plain\" data-delay=\"0.2\" data-interval=\"2500\">dog</span>"));
		assert!(page.contains("data-start=\"hidden\" data-delay=\"0.0\" data-interval=\"2500\">Zm94</span>"));
		assert!(page.contains("--line-margin: 0.20em; --line-height: 1.00;"));
	}

	#[test]
	fn empty_poem_still_renders_a_page() {
		let page = render_page(&FlickerPoem { lines: Vec::new(), line_spacing: 0.3 });
		assert!(page.contains("<div class=\"poem\""));
		assert!(!page.contains("class=\"line\""));
	}

	#[test]
	fn markup_is_escaped() {
		assert_eq!(escape("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#39;");
		assert_eq!(escape("plain"), "plain");
	}
}
