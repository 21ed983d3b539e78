//! Run configuration and static ignore tables
//!
//! Every knob lives in one immutable `Config` value, built once from the CLI
//! and passed by shared reference into every operation. The ignore tables are
//! process-wide constants.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::time::Duration;

/// Default maximum file size in bytes (1 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Default deadline for one run, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of pool workers per directory argument
pub const DEFAULT_WORKERS: usize = 10;

/// Default number of fuzzy matches offered for selection
pub const DEFAULT_MAX_MATCHES: usize = 15;

/// Default maximum fuzzy search depth
pub const DEFAULT_SEARCH_DEPTH: usize = 5;

/// Immutable per-run configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum file size to ingest (bytes)
    pub max_file_size: u64,

    /// Deadline for the whole run
    pub timeout: Duration,

    /// Worker threads per directory argument
    pub workers: usize,

    /// Emit per-file diagnostics
    pub verbose: bool,

    /// Maximum candidates shown by the fuzzy prompt
    pub max_matches: usize,

    /// Maximum directory depth for fuzzy search
    pub search_depth: usize,

    /// Resolve without prompting when the best match is decisive
    pub auto_select: bool,

    /// Include hidden files and directories
    pub search_hidden: bool,

    /// Disable all ignore rules
    pub no_ignore: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            workers: DEFAULT_WORKERS,
            verbose: false,
            max_matches: DEFAULT_MAX_MATCHES,
            search_depth: DEFAULT_SEARCH_DEPTH,
            auto_select: false,
            search_hidden: false,
            no_ignore: false,
        }
    }
}

/// Directory names skipped during search and traversal
pub static IGNORE_DIRS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "node_modules",
        ".git",
        ".svn",
        ".hg",
        "dist",
        "build",
        "out",
        "target",
        "bin",
        "obj",
        ".idea",
        ".vscode",
        ".vs",
        "vendor",
        "bower_components",
        "jspm_packages",
        "tmp",
        "temp",
        "logs",
        "log",
        ".npm",
        "coverage",
        ".next",
        ".nuxt",
        ".cache",
        ".parcel-cache",
    ]
    .into_iter()
    .collect()
});

/// File suffixes skipped during search and traversal.
///
/// The set is dual-use: each key is looked up as a whole dotted extension and
/// also matched as an arbitrary name suffix, so `.min.js` catches minified
/// bundles and `Thumbs.db` catches that exact file name.
pub static IGNORE_SUFFIXES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        ".log",
        ".lock",
        ".min.js",
        ".min.css",
        ".map",
        ".DS_Store",
        "Thumbs.db",
        ".gitignore",
        ".gitattributes",
        ".eslintrc",
        ".prettierrc",
    ]
    .into_iter()
    .collect()
});

/// Extensions excluded from ingestion as binary content (lowercase)
pub static BINARY_EXTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        ".bin", ".exe", ".dll", ".so", ".dylib", ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".zip",
        ".tar", ".gz", ".rar", ".7z", ".pdf", ".doc", ".docx", ".xls", ".xlsx",
    ]
    .into_iter()
    .collect()
});
