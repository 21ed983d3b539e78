//! Interactive match selection
//!
//! The resolver only needs "show these candidates, read one choice back".
//! Keeping that behind a trait lets tests drive resolution without a TTY.

use colored::Colorize;
use std::io::{self, BufRead, Write};

use super::FuzzyMatch;

/// Collaborator that picks one candidate or declines.
///
/// `select` returns the index into `matches` of the chosen candidate, or
/// `None` for "none of these".
pub trait MatchPrompt {
    fn select(&mut self, query: &str, matches: &[FuzzyMatch]) -> Option<usize>;
}

/// Stdin-driven prompt used by the binary.
///
/// Prints the candidate list to stderr, then blocks on one line of input.
/// Malformed or out-of-range selections re-prompt; EOF counts as a decline.
pub struct StdinPrompt;

impl MatchPrompt for StdinPrompt {
    fn select(&mut self, query: &str, matches: &[FuzzyMatch]) -> Option<usize> {
        eprintln!("{}", format!("'{query}' not found. Did you mean:").yellow());
        for (i, m) in matches.iter().enumerate() {
            let kind = if m.is_dir { "dir " } else { "file" };
            eprintln!(
                "[{}] {} ({}, score: {}, depth: {})",
                i + 1,
                m.path.display(),
                kind,
                m.score,
                m.depth
            );
        }
        eprintln!("[0] None of these");

        let stdin = io::stdin();
        let mut input = String::new();
        loop {
            eprint!("Enter selection (0-{}): ", matches.len());
            let _ = io::stderr().flush();

            input.clear();
            match stdin.lock().read_line(&mut input) {
                Ok(0) | Err(_) => return None,
                Ok(_) => {}
            }

            match input.trim().parse::<usize>() {
                Ok(0) => return None,
                Ok(n) if n <= matches.len() => return Some(n - 1),
                _ => eprintln!("Invalid selection. Please try again."),
            }
        }
    }
}
