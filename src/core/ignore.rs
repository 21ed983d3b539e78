//! Ignore policy
//!
//! One pure predicate decides whether a path is excluded from both fuzzy
//! search and ingestion. Directories that match are pruned as whole
//! subtrees by the callers.

use std::path::Path;

use crate::core::config::{Config, IGNORE_DIRS, IGNORE_SUFFIXES};
use crate::core::paths::{base_name, dotted_ext};

/// Whether `path` should be excluded from traversal and search.
///
/// `--no-ignore` short-circuits everything. Hidden entries (name starts with
/// `.` and is longer than one character) are excluded unless `--hidden` is
/// set. Directory names match against [`IGNORE_DIRS`]; file names match
/// their dotted extension against [`IGNORE_SUFFIXES`] and then the full name
/// against the same set treated as suffix patterns.
pub fn should_ignore(path: &Path, is_dir: bool, cfg: &Config) -> bool {
    if cfg.no_ignore {
        return false;
    }

    let name = base_name(path);
    if !cfg.search_hidden && name.len() > 1 && name.starts_with('.') {
        return true;
    }

    if is_dir {
        return IGNORE_DIRS.contains(name);
    }

    if IGNORE_SUFFIXES.contains(dotted_ext(name)) {
        return true;
    }

    IGNORE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> Config {
        Config::default()
    }

    #[test]
    fn test_no_ignore_overrides_everything() {
        let cfg = Config {
            no_ignore: true,
            ..Config::default()
        };
        assert!(!should_ignore(Path::new("node_modules"), true, &cfg));
        assert!(!should_ignore(Path::new(".git"), true, &cfg));
        assert!(!should_ignore(Path::new("app.min.js"), false, &cfg));
        assert!(!should_ignore(Path::new(".env"), false, &cfg));
    }

    #[test]
    fn test_hidden_entries() {
        assert!(should_ignore(Path::new(".env"), false, &cfg()));
        assert!(should_ignore(Path::new("src/.hidden"), true, &cfg()));

        let hidden_ok = Config {
            search_hidden: true,
            ..Config::default()
        };
        assert!(!should_ignore(Path::new(".env"), false, &hidden_ok));
        // .git stays ignored through the directory set even with --hidden
        assert!(should_ignore(Path::new(".git"), true, &hidden_ok));
    }

    #[test]
    fn test_single_dot_is_not_hidden() {
        assert!(!should_ignore(Path::new("."), true, &cfg()));
    }

    #[test]
    fn test_ignored_directories() {
        assert!(should_ignore(Path::new("node_modules"), true, &cfg()));
        assert!(should_ignore(Path::new("a/b/target"), true, &cfg()));
        assert!(!should_ignore(Path::new("src"), true, &cfg()));
        // set membership is by name, not by path, and only for directories
        assert!(!should_ignore(Path::new("node_modules"), false, &cfg()));
    }

    #[test]
    fn test_ignored_extensions_and_suffixes() {
        assert!(should_ignore(Path::new("debug.log"), false, &cfg()));
        assert!(should_ignore(Path::new("Cargo.lock"), false, &cfg()));
        // suffix scan: extension of app.min.js is .js, the .min.js key
        // matches as a name suffix
        assert!(should_ignore(Path::new("app.min.js"), false, &cfg()));
        assert!(should_ignore(Path::new("style.min.css"), false, &cfg()));
        assert!(should_ignore(Path::new("Thumbs.db"), false, &cfg()));
        assert!(!should_ignore(Path::new("main.rs"), false, &cfg()));
        assert!(!should_ignore(Path::new("notes.db"), false, &cfg()));
    }
}
