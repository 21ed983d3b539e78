//! Fuzzy path resolution
//!
//! Resolves approximate path arguments against the real tree. A
//! depth-bounded recursive search scores every surviving entry against the
//! target name, ranks the candidates, and either auto-selects a decisive
//! best match or asks the operator through the prompt collaborator.

pub mod prompt;

use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use crate::core::config::Config;
use crate::core::ignore::should_ignore;
use crate::core::log::DebugLog;
use crate::core::paths::{base_name, trim_quotes};
use crate::core::similarity::distance;
use self::prompt::MatchPrompt;

/// How a candidate matched the target name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Substring,
    Fuzzy,
}

impl MatchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchKind::Exact => "exact",
            MatchKind::Substring => "substring",
            MatchKind::Fuzzy => "fuzzy",
        }
    }
}

/// One scored candidate produced during a search.
///
/// Lower scores are more similar; 0 is an exact (case-insensitive) name
/// match. Candidates live only for the duration of one resolution.
#[derive(Debug, Clone)]
pub struct FuzzyMatch {
    pub path: PathBuf,
    pub name: String,
    pub score: usize,
    pub is_dir: bool,
    pub depth: usize,
    pub kind: MatchKind,
}

/// Resolve one raw argument to an on-disk path.
///
/// An existing path is returned untouched, with no search and no prompt.
/// Otherwise the leaf name is fuzzy-searched under its parent directory,
/// which is itself fuzzy-resolved first when missing.
pub fn resolve(
    raw: &str,
    cfg: &Config,
    log: &DebugLog,
    prompt: &mut dyn MatchPrompt,
) -> Option<PathBuf> {
    let clean = trim_quotes(raw);
    let candidate = Path::new(clean);
    if candidate.exists() {
        return Some(candidate.to_path_buf());
    }

    log.line(&format!("fuzzy search for '{clean}'"));
    fuzzy_find(clean, cfg, log, prompt)
}

fn fuzzy_find(
    approx: &str,
    cfg: &Config,
    log: &DebugLog,
    prompt: &mut dyn MatchPrompt,
) -> Option<PathBuf> {
    let (dir, target) = split_target(approx);

    // Resolution is compositional: a missing prefix is resolved with the
    // same algorithm before the leaf is searched.
    let dir = if dir == Path::new(".") || dir.exists() {
        dir
    } else {
        let prefix = dir.to_string_lossy().into_owned();
        match fuzzy_find(&prefix, cfg, log, prompt) {
            Some(resolved) => resolved,
            None => {
                eprintln!("Cannot find directory: {prefix}");
                return None;
            }
        }
    };

    let mut matches = Vec::new();
    collect_matches(&dir, &target.to_lowercase(), 0, cfg, &mut matches);

    if matches.is_empty() {
        eprintln!(
            "No matches found for '{}' anywhere in '{}'",
            target,
            dir.display()
        );
        return None;
    }

    sort_matches(&mut matches);

    if cfg.auto_select {
        let best = &matches[0];
        if best.score <= auto_select_threshold(&target) {
            eprintln!(
                "Auto-selected best match for '{}': {}",
                approx,
                best.path.display()
            );
            log.line(&format!(
                "auto-selected {} for '{}' (score {}, {})",
                best.path.display(),
                approx,
                best.score,
                best.kind.as_str()
            ));
            return Some(best.path.clone());
        }
    }

    let shown = matches.len().min(cfg.max_matches);
    prompt
        .select(approx, &matches[..shown])
        .map(|idx| matches[idx].path.clone())
}

/// Split an argument into the directory to search and the leaf target name
fn split_target(approx: &str) -> (PathBuf, String) {
    if !approx.contains(MAIN_SEPARATOR) {
        return (PathBuf::from("."), approx.to_string());
    }

    let path = Path::new(approx);
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    (dir, base_name(path).to_string())
}

/// Rank candidates ascending by score, ties broken by shallower depth.
///
/// The sort is stable and keyed only on (score, depth), so the final order
/// does not depend on filesystem enumeration order.
fn sort_matches(matches: &mut [FuzzyMatch]) {
    matches.sort_by_key(|m| (m.score, m.depth));
}

/// Best score at or below which auto-select fires
fn auto_select_threshold(target: &str) -> usize {
    (target.chars().count() / 4).max(2)
}

/// Largest edit distance still accepted as a fuzzy candidate
fn fuzzy_threshold(target_len: usize) -> usize {
    (target_len * 2 / 3).max(3)
}

/// Collect scored candidates under `dir`, depth-first up to
/// `cfg.search_depth`. Ignored entries are pruned entirely, directories as
/// whole subtrees.
fn collect_matches(
    dir: &Path,
    target_lower: &str,
    depth: usize,
    cfg: &Config,
    out: &mut Vec<FuzzyMatch>,
) {
    if depth > cfg.search_depth {
        return;
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            if cfg.verbose {
                eprintln!("Error reading directory {}: {}", dir.display(), err);
            }
            return;
        }
    };

    let target_len = target_lower.chars().count();
    let mut subdirs = Vec::new();

    for entry in entries.flatten() {
        let path = entry.path();
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

        if should_ignore(&path, is_dir, cfg) {
            continue;
        }
        if is_dir {
            subdirs.push(path.clone());
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let name_lower = name.to_lowercase();
        let name_len = name_lower.chars().count();

        if name_lower == target_lower {
            out.push(FuzzyMatch {
                path,
                name,
                score: 0,
                is_dir,
                depth,
                kind: MatchKind::Exact,
            });
        } else if name_lower.contains(target_lower) || target_lower.contains(&name_lower) {
            out.push(FuzzyMatch {
                path,
                name,
                score: 1 + name_len.abs_diff(target_len),
                is_dir,
                depth,
                kind: MatchKind::Substring,
            });
        } else {
            let dist = distance(&name_lower, target_lower);
            if dist <= fuzzy_threshold(target_len) {
                out.push(FuzzyMatch {
                    path,
                    name,
                    score: dist + 2,
                    is_dir,
                    depth,
                    kind: MatchKind::Fuzzy,
                });
            }
        }
    }

    for subdir in subdirs {
        collect_matches(&subdir, target_lower, depth + 1, cfg, out);
    }
}
