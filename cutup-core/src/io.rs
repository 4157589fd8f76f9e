use std::path::{Path, PathBuf};
use std::{env, fs, io};

use rand::Rng;
use rand::seq::index;

/// Reads a whole text file into a `String`.
pub fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	fs::read_to_string(filename)
}

/// Writes `contents` to `path`, creating missing parent directories.
pub fn write_file<P: AsRef<Path>>(path: P, contents: &str) -> io::Result<()> {
	let path = path.as_ref();
	if let Some(parent) = path.parent() {
		if !parent.as_os_str().is_empty() {
			fs::create_dir_all(parent)?;
		}
	}
	fs::write(path, contents)
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./texts/moby.txt"` → `"moby"`
/// - `"moby.txt"` → `"moby"`
pub fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder(input: &str) -> PathBuf {
	if input == "." || input == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Lists all files with a given extension directly inside a directory.
///
/// Returns full paths, sorted. Subdirectories are ignored.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<PathBuf>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			files.push(path);
		}
	}

	files.sort();
	Ok(files)
}

/// Derives an output filename from the words of the cleaned source.
///
/// Joins 2 to 4 randomly sampled source words with `_` (all of them if the
/// text has fewer). Falls back to `fallback` when there are no words.
///
/// Example: `["sea", "salt", "lamp"]` → `"lamp_sea.txt"`
pub fn title_filename<R: Rng + ?Sized>(
	words: &[String],
	fallback: &str,
	extension: &str,
	rng: &mut R,
) -> String {
	let title = if words.is_empty() {
		fallback.to_owned()
	} else {
		let count = rng.random_range(2..=4).min(words.len());
		index::sample(rng, words.len(), count)
			.into_iter()
			.map(|i| words[i].as_str())
			.collect::<Vec<_>>()
			.join("_")
	};
	format!("{title}.{extension}")
}
