//! Append-only debug log
//!
//! Diagnostics are best-effort: a disabled or failing log never affects the
//! run. The handle is shared by reference across worker threads.

use chrono::Local;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Optional diagnostic sink
pub struct DebugLog {
    file: Option<Mutex<File>>,
}

impl DebugLog {
    /// A log that drops every line
    pub fn disabled() -> Self {
        Self { file: None }
    }

    /// Create (or truncate) `path` and log into it
    pub fn open(path: &Path) -> std::io::Result<Self> {
        Ok(Self {
            file: Some(Mutex::new(File::create(path)?)),
        })
    }

    /// Append one timestamped line; write failures are swallowed
    pub fn line(&self, msg: &str) {
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let stamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
                let _ = writeln!(file, "[{stamp}] {msg}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_log_is_inert() {
        let log = DebugLog::disabled();
        log.line("nothing happens");
    }

    #[test]
    fn test_open_log_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debug.log");

        let log = DebugLog::open(&path).unwrap();
        log.line("first");
        log.line("second");

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("first"));
        assert!(lines[1].ends_with("second"));
    }
}
