/// Reduces an untrusted filename to something safe to join onto the upload
/// directory: path separators become underscores along with any whitespace,
/// everything outside `[A-Za-z0-9_.-]` is dropped, and leading/trailing `.`
/// and `_` are stripped. May return an empty string, which callers must
/// reject.
pub fn secure_filename(name: &str) -> String {
	let spaced: String = name
		.chars()
		.map(|c| if c == '/' || c == '\\' { ' ' } else { c })
		.collect();
	let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
	let kept: String = joined
		.chars()
		.filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
		.collect();
	kept.trim_matches(|c| c == '.' || c == '_').to_owned()
}
