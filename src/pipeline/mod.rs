//! Concurrent ingestion pipeline
//!
//! One invocation per resolved top-level argument. A plain file is
//! validated and read inline; a directory fans out to a fixed worker pool
//! fed by a bounded path queue, so the walker is throttled to processing
//! speed. Every successful read emits one record into the shared output
//! channel. The run deadline turns in-flight work into a quiet cancellation
//! rather than an error.

use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Instant;
use thiserror::Error;
use walkdir::WalkDir;

use crate::core::config::{Config, BINARY_EXTS};
use crate::core::ignore::should_ignore;
use crate::core::log::DebugLog;
use crate::core::paths::{base_name, dotted_ext};

/// Capacity of the walker-to-worker path queue and of the output channel
pub const CHANNEL_CAPACITY: usize = 100;

/// One successfully ingested file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRecord {
    pub path: String,
    pub content: String,
}

/// Shared success/error tallies for one run.
///
/// Incremented from every worker of every pipeline invocation; never reset.
#[derive(Debug, Default)]
pub struct RunCounters {
    processed: AtomicU64,
    errors: AtomicU64,
}

impl RunCounters {
    pub fn add_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }
}

/// Why a file did not produce a record
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("file too large (size: {size} bytes)")]
    TooLarge { size: u64 },

    #[error("skipped binary file")]
    BinaryFile,

    #[error("deadline exceeded")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl IngestError {
    /// Cancellation is an outcome, not a failure: it is never counted
    pub fn is_cancellation(&self) -> bool {
        matches!(self, IngestError::Cancelled)
    }
}

/// Ingest one resolved path, file or directory.
///
/// Emits records into `out` and updates `counters`. Failures stay local to
/// this path; the function returns once all work for it has finished and
/// every worker it spawned has exited.
pub fn process_path(
    path: &Path,
    cfg: &Config,
    deadline: Instant,
    out: &Sender<ContentRecord>,
    counters: &RunCounters,
    log: &DebugLog,
) {
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(err) => {
            eprintln!("Error accessing {}: {}", path.display(), err);
            counters.add_error();
            return;
        }
    };

    if meta.is_dir() {
        process_directory(path, cfg, deadline, out, counters, log);
    } else {
        finish_file(path, meta.len(), cfg, deadline, out, counters, log);
    }
}

/// Validate, read, and emit one file, then settle the counters
fn finish_file(
    path: &Path,
    size: u64,
    cfg: &Config,
    deadline: Instant,
    out: &Sender<ContentRecord>,
    counters: &RunCounters,
    log: &DebugLog,
) {
    match process_file(path, size, cfg, deadline, out) {
        Ok(()) => counters.add_processed(),
        Err(err) if err.is_cancellation() => {
            log.line(&format!("cancelled while ingesting {}", path.display()));
        }
        Err(err) => {
            counters.add_error();
            if cfg.verbose {
                eprintln!("Error processing {}: {}", path.display(), err);
            }
            log.line(&format!("error for {}: {}", path.display(), err));
        }
    }
}

/// Size and extension validation plus the deadline-raced read and emit
fn process_file(
    path: &Path,
    size: u64,
    cfg: &Config,
    deadline: Instant,
    out: &Sender<ContentRecord>,
) -> Result<(), IngestError> {
    if size > cfg.max_file_size {
        return Err(IngestError::TooLarge { size });
    }

    let ext = dotted_ext(base_name(path)).to_lowercase();
    if BINARY_EXTS.contains(ext.as_str()) {
        return Err(IngestError::BinaryFile);
    }

    if Instant::now() >= deadline {
        return Err(IngestError::Cancelled);
    }

    let bytes = fs::read(path)?;
    let record = ContentRecord {
        path: path.display().to_string(),
        content: String::from_utf8_lossy(&bytes).into_owned(),
    };

    // A record that cannot be placed before the deadline is dropped, and a
    // consumer that went away means the run is shutting down.
    match out.send_deadline(record, deadline) {
        Ok(()) => Ok(()),
        Err(SendTimeoutError::Timeout(_)) | Err(SendTimeoutError::Disconnected(_)) => {
            Err(IngestError::Cancelled)
        }
    }
}

/// Walk a directory into a bounded queue drained by `cfg.workers` workers
fn process_directory(
    dir: &Path,
    cfg: &Config,
    deadline: Instant,
    out: &Sender<ContentRecord>,
    counters: &RunCounters,
    log: &DebugLog,
) {
    let (path_tx, path_rx) = bounded::<PathBuf>(CHANNEL_CAPACITY);

    thread::scope(|scope| {
        for _ in 0..cfg.workers.max(1) {
            let rx = path_rx.clone();
            scope.spawn(move || worker_loop(rx, cfg, deadline, out, counters, log));
        }
        drop(path_rx);

        match walk_into_queue(dir, cfg, deadline, &path_tx, counters) {
            Ok(enqueued) => {
                log.line(&format!("walked {}: {} files enqueued", dir.display(), enqueued));
            }
            Err(err) if err.is_cancellation() => {
                log.line(&format!("walk of {} stopped at deadline", dir.display()));
            }
            Err(err) => {
                eprintln!("Error walking directory {}: {}", dir.display(), err);
                counters.add_error();
            }
        }

        // Closing the queue lets the workers drain and exit; the scope
        // joins them before this invocation reports completion.
        drop(path_tx);
    });
}

/// Top-down walk with whole-subtree pruning. Ignored files never reach the
/// queue; per-entry errors are counted and the walk continues.
fn walk_into_queue(
    dir: &Path,
    cfg: &Config,
    deadline: Instant,
    queue: &Sender<PathBuf>,
    counters: &RunCounters,
) -> Result<u64, IngestError> {
    let mut enqueued = 0u64;

    // The root was named explicitly by the operator, so it is exempt from
    // the ignore policy, same as an explicit single-file argument.
    let walker = WalkDir::new(dir).into_iter().filter_entry(|entry| {
        entry.depth() == 0 || !should_ignore(entry.path(), entry.file_type().is_dir(), cfg)
    });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                counters.add_error();
                if cfg.verbose {
                    eprintln!("Error walking {}: {}", dir.display(), err);
                }
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        // Backpressure: block here while the workers are saturated, but
        // never past the deadline.
        if queue.send_deadline(entry.into_path(), deadline).is_err() {
            return Err(IngestError::Cancelled);
        }
        enqueued += 1;
    }

    Ok(enqueued)
}

/// Pop paths until the queue closes. Each path is re-stat'ed because files
/// can vanish between the walk and the dequeue.
fn worker_loop(
    rx: Receiver<PathBuf>,
    cfg: &Config,
    deadline: Instant,
    out: &Sender<ContentRecord>,
    counters: &RunCounters,
    log: &DebugLog,
) {
    for path in rx.iter() {
        let size = match fs::metadata(&path) {
            Ok(meta) => meta.len(),
            Err(err) => {
                counters.add_error();
                if cfg.verbose {
                    eprintln!("Error stating {}: {}", path.display(), err);
                }
                continue;
            }
        };

        finish_file(&path, size, cfg, deadline, out, counters, log);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn run_pipeline(path: &Path, cfg: &Config, deadline: Instant) -> (Vec<ContentRecord>, RunCounters) {
        let counters = RunCounters::default();
        let log = DebugLog::disabled();
        let (tx, rx) = bounded(CHANNEL_CAPACITY);

        process_path(path, cfg, deadline, &tx, &counters, &log);
        drop(tx);

        (rx.iter().collect(), counters)
    }

    fn far_deadline() -> Instant {
        Instant::now() + Duration::from_secs(30)
    }

    fn tree_with(files: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (path, content) in files {
            let full = dir.path().join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(full, content).unwrap();
        }
        dir
    }

    #[test]
    fn test_single_file_emits_one_record() {
        let tree = tree_with(&[("notes.txt", "hello")]);
        let file = tree.path().join("notes.txt");

        let (records, counters) = run_pipeline(&file, &Config::default(), far_deadline());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content, "hello");
        assert_eq!(records[0].path, file.display().to_string());
        assert_eq!(counters.processed(), 1);
        assert_eq!(counters.errors(), 0);
    }

    #[test]
    fn test_oversize_file_counts_one_error() {
        let tree = tree_with(&[("big.txt", "")]);
        let file = tree.path().join("big.txt");
        fs::write(&file, vec![b'x'; 11]).unwrap();

        let cfg = Config {
            max_file_size: 10,
            ..Config::default()
        };
        let (records, counters) = run_pipeline(&file, &cfg, far_deadline());

        assert!(records.is_empty());
        assert_eq!(counters.processed(), 0);
        assert_eq!(counters.errors(), 1);
    }

    #[test]
    fn test_binary_extension_is_rejected() {
        let tree = tree_with(&[("image.PNG", "not really a png")]);
        let file = tree.path().join("image.PNG");

        let (records, counters) = run_pipeline(&file, &Config::default(), far_deadline());

        assert!(records.is_empty());
        assert_eq!(counters.errors(), 1);
    }

    #[test]
    fn test_missing_path_counts_one_error() {
        let tree = tempfile::tempdir().unwrap();
        let missing = tree.path().join("gone.txt");

        let (records, counters) = run_pipeline(&missing, &Config::default(), far_deadline());

        assert!(records.is_empty());
        assert_eq!(counters.errors(), 1);
    }

    #[test]
    fn test_directory_ingests_every_eligible_file() {
        let tree = tree_with(&[
            ("a.txt", "a"),
            ("sub/b.txt", "b"),
            ("sub/deep/c.txt", "c"),
        ]);

        let cfg = Config {
            workers: 3,
            ..Config::default()
        };
        let (records, counters) = run_pipeline(tree.path(), &cfg, far_deadline());

        assert_eq!(records.len(), 3);
        assert_eq!(counters.processed(), 3);
        assert_eq!(counters.errors(), 0);

        let mut contents: Vec<_> = records.iter().map(|r| r.content.as_str()).collect();
        contents.sort_unstable();
        assert_eq!(contents, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_counters_account_for_every_submitted_file() {
        let tree = tree_with(&[("ok1.txt", "1"), ("ok2.txt", "2"), ("big.txt", "too large")]);

        let cfg = Config {
            max_file_size: 5,
            workers: 2,
            ..Config::default()
        };
        let (records, counters) = run_pipeline(tree.path(), &cfg, far_deadline());

        // big.txt passes the walk (the ignore policy knows nothing about
        // sizes) and is rejected by a worker, so processed + errors covers
        // all three submitted files.
        assert_eq!(records.len(), 2);
        assert_eq!(counters.processed() + counters.errors(), 3);
        assert_eq!(counters.errors(), 1);
    }

    #[test]
    fn test_ignored_subtree_is_never_walked() {
        let tree = tree_with(&[
            ("keep.txt", "keep"),
            ("node_modules/skip.js", "skip"),
            ("node_modules/deep/also.js", "skip"),
            ("app.min.js", "skip"),
        ]);

        let (records, counters) = run_pipeline(tree.path(), &Config::default(), far_deadline());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content, "keep");
        assert_eq!(counters.processed(), 1);
        assert_eq!(counters.errors(), 0);
    }

    #[test]
    fn test_no_ignore_walks_everything() {
        let tree = tree_with(&[("keep.txt", "keep"), ("node_modules/skip.js", "skip")]);

        let cfg = Config {
            no_ignore: true,
            ..Config::default()
        };
        let (records, _) = run_pipeline(tree.path(), &cfg, far_deadline());
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_expired_deadline_terminates_cleanly() {
        let tree = tree_with(&[
            ("a.txt", "a"),
            ("b.txt", "b"),
            ("c.txt", "c"),
            ("d.txt", "d"),
        ]);

        let deadline = Instant::now();
        let (records, counters) = run_pipeline(tree.path(), &Config::default(), deadline);

        // Cancellation drops records without counting errors; nothing hangs
        // and the worker scope has already joined by the time we get here.
        assert!(records.len() <= 4);
        assert_eq!(counters.errors(), 0);
        assert!(counters.processed() == records.len() as u64);
    }

    #[test]
    fn test_lossy_read_of_invalid_utf8() {
        let tree = tempfile::tempdir().unwrap();
        let file = tree.path().join("weird.txt");
        fs::write(&file, [0x66, 0x6f, 0xff, 0x6f]).unwrap();

        let (records, counters) = run_pipeline(&file, &Config::default(), far_deadline());

        assert_eq!(records.len(), 1);
        assert!(records[0].content.contains('\u{FFFD}'));
        assert_eq!(counters.processed(), 1);
    }
}
