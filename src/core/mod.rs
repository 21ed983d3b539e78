//! Core module - configuration, ignore policy, similarity scoring, helpers
//!
//! This module provides:
//! - The immutable per-run `Config` and the static ignore tables
//! - The ignore predicate shared by search and ingestion
//! - Edit-distance scoring for fuzzy matching
//! - Path helpers and the optional debug log

pub mod config;
pub mod ignore;
pub mod log;
pub mod paths;
pub mod similarity;
