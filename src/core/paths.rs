//! Path helpers
//!
//! Small utilities shared by the ignore policy, the resolver, and the
//! pipeline.

use std::path::Path;

/// Strip surrounding shell quote characters from a raw argument
pub fn trim_quotes(raw: &str) -> &str {
    raw.trim_matches(|c| c == '"' || c == '\'')
}

/// Base name of a path as UTF-8 (lossy inputs fall back to empty)
pub fn base_name(path: &Path) -> &str {
    path.file_name().and_then(|name| name.to_str()).unwrap_or("")
}

/// Dotted extension of a file name, from the final `.` to the end.
///
/// `"main.go"` gives `".go"`, `"archive.tar.gz"` gives `".gz"`, and a name
/// with no dot gives `""`. A leading dot counts, so `".gitignore"` gives
/// `".gitignore"`; the ignore tables rely on that.
pub fn dotted_ext(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) => &name[idx..],
        None => "",
    }
}
