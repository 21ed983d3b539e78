//! CLI module - argument surface and run orchestration
//!
//! Resolution happens up front and may block on the interactive prompt;
//! after that, one pipeline per resolved path runs concurrently and their
//! records converge on a single bounded channel consumed here.

use anyhow::{bail, Result};
use clap::Parser;
use colored::Colorize;
use crossbeam_channel::{bounded, tick, Receiver};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use crate::core::config::{
    Config, DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_MATCHES, DEFAULT_SEARCH_DEPTH,
    DEFAULT_TIMEOUT_SECS, DEFAULT_WORKERS,
};
use crate::core::log::DebugLog;
use crate::finder::{self, prompt::StdinPrompt};
use crate::output::{push_record, FileSink, Sink, StdoutSink};
use crate::pipeline::{self, ContentRecord, RunCounters};

/// Name of the debug log file created by `--debug`
const DEBUG_LOG_FILE: &str = "fgather_debug.log";

/// fgather - gather text from sloppily spelled paths into one bundle.
#[derive(Parser, Debug)]
#[command(name = "fgather")]
#[command(
    author,
    version,
    about,
    long_about = r#"fgather takes a list of file or directory paths, resolves each one against
the real filesystem (fuzzy search when the literal path does not exist), and
reads every eligible text file underneath with a bounded worker pool. The
result is one concatenated bundle of

    -- <path> --
    <content>

blocks, written to stdout (or --out FILE) for piping into other tools.

Examples:
    fgather src/main.rs notes/
    fgather confg.jsn --auto
    fgather . --max-size 65536 --out bundle.txt
"#
)]
pub struct Cli {
    /// Paths to gather; approximate names are fuzzy-resolved.
    #[arg(
        required = true,
        value_name = "PATH",
        long_help = "Paths to gather. Each argument may be a file or a directory, and may be\n\
misspelled: anything that does not exist on disk is resolved by a scored\n\
fuzzy search under its parent directory. Surrounding quotes are stripped."
    )]
    pub paths: Vec<String>,

    /// Maximum file size in bytes.
    #[arg(
        long = "max-size",
        default_value_t = DEFAULT_MAX_FILE_SIZE,
        value_name = "BYTES",
        long_help = "Maximum file size in bytes. Larger files are skipped and counted as\n\
errors."
    )]
    pub max_size: u64,

    /// Timeout for the whole run, in seconds.
    #[arg(
        long,
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_name = "SECS",
        long_help = "Deadline for the whole run, in seconds. When it fires, in-flight files\n\
are dropped quietly and the run finishes with whatever was gathered."
    )]
    pub timeout: u64,

    /// Number of concurrent workers per directory argument.
    #[arg(long, default_value_t = DEFAULT_WORKERS, value_name = "N")]
    pub workers: usize,

    /// Verbose output (per-file diagnostics and progress).
    #[arg(short, long)]
    pub verbose: bool,

    /// Maximum number of fuzzy matches to display.
    #[arg(long = "max-matches", default_value_t = DEFAULT_MAX_MATCHES, value_name = "N")]
    pub max_matches: usize,

    /// Maximum depth to search for fuzzy matches.
    #[arg(long = "depth", default_value_t = DEFAULT_SEARCH_DEPTH, value_name = "N")]
    pub depth: usize,

    /// Automatically select the best match if its score is good enough.
    #[arg(long = "auto")]
    pub auto_select: bool,

    /// Include hidden files in search and traversal.
    #[arg(long)]
    pub hidden: bool,

    /// Don't skip commonly ignored directories and files.
    #[arg(long = "no-ignore")]
    pub no_ignore: bool,

    /// Write a diagnostic log to fgather_debug.log.
    #[arg(long)]
    pub debug: bool,

    /// Write the bundle to FILE instead of stdout.
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            max_file_size: self.max_size,
            timeout: Duration::from_secs(self.timeout),
            workers: self.workers,
            verbose: self.verbose,
            max_matches: self.max_matches,
            search_depth: self.depth,
            auto_select: self.auto_select,
            search_hidden: self.hidden,
            no_ignore: self.no_ignore,
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let cfg = cli.config();
    let log = open_log(cli.debug);
    let deadline = Instant::now() + cfg.timeout;

    // Resolve everything before any ingestion starts; unresolved arguments
    // are skipped, the rest proceed.
    let mut prompt = StdinPrompt;
    let mut resolved: Vec<PathBuf> = Vec::with_capacity(cli.paths.len());
    for raw in &cli.paths {
        match finder::resolve(raw, &cfg, &log, &mut prompt) {
            Some(path) => {
                log.line(&format!("resolved '{}' -> {}", raw, path.display()));
                resolved.push(path);
            }
            None => {
                eprintln!(
                    "{}",
                    format!("Warning: skipping {raw}, no good match was found").yellow()
                );
            }
        }
    }

    if resolved.is_empty() {
        bail!("no valid paths to process");
    }

    let counters = RunCounters::default();
    let (record_tx, record_rx) = bounded::<ContentRecord>(pipeline::CHANNEL_CAPACITY);
    let (done_tx, done_rx) = bounded::<()>(0);

    let mut bundle = String::new();
    let mut gathered = 0usize;

    {
        let cfg = &cfg;
        let counters = &counters;
        let log = &log;
        let resolved = &resolved;

        thread::scope(|scope| {
            for path in resolved {
                let tx = record_tx.clone();
                scope.spawn(move || {
                    pipeline::process_path(path, cfg, deadline, &tx, counters, log);
                });
            }
            drop(record_tx);

            if cfg.verbose {
                scope.spawn(move || progress_loop(counters, done_rx));
            }

            // Single consumer: arrival order, no ordering across arguments.
            for record in record_rx.iter() {
                gathered += 1;
                push_record(&mut bundle, &record);
            }
            drop(done_tx);
        });
    }

    if cfg.verbose {
        eprintln!();
    }

    let errors = counters.errors();
    if bundle.is_empty() {
        if errors > 0 {
            eprintln!("{}", format!("({errors} errors occurred)").red());
        }
        bail!("no content was found to gather");
    }

    let mut sink: Box<dyn Sink> = match &cli.out {
        Some(path) => Box::new(FileSink(path.clone())),
        None => Box::new(StdoutSink),
    };
    sink.store(bundle.as_bytes())?;

    let destination = match &cli.out {
        Some(path) => format!(" into {}", path.display()),
        None => String::new(),
    };
    eprintln!(
        "{}",
        format!(
            "Gathered content from {} files ({} bytes){}",
            gathered,
            bundle.len(),
            destination
        )
        .green()
    );
    if errors > 0 {
        eprintln!("{}", format!("({errors} errors occurred)").red());
    }

    log.line(&format!(
        "run complete: {} files, {} bytes, {} errors",
        gathered,
        bundle.len(),
        errors
    ));
    Ok(())
}

fn open_log(debug: bool) -> DebugLog {
    if !debug {
        return DebugLog::disabled();
    }
    match DebugLog::open(Path::new(DEBUG_LOG_FILE)) {
        Ok(log) => log,
        Err(err) => {
            eprintln!(
                "{}",
                format!("Warning: could not create debug log: {err}").yellow()
            );
            DebugLog::disabled()
        }
    }
}

/// Repaint a progress line every 200ms until the consumer finishes
fn progress_loop(counters: &RunCounters, done: Receiver<()>) {
    let ticker = tick(Duration::from_millis(200));
    loop {
        crossbeam_channel::select! {
            recv(ticker) -> _ => {
                eprint!("\rProcessed: {} files", counters.processed());
                let _ = std::io::stderr().flush();
            }
            recv(done) -> _ => return,
        }
    }
}
