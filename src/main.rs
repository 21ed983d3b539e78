//! fgather - bundle text content from sloppily spelled paths
//!
//! fgather provides:
//! - Fuzzy resolution of misspelled file and directory arguments
//! - Concurrent ingestion of the resolved paths with a bounded worker pool
//! - One concatenated text bundle on stdout (or a file) for downstream tools

use anyhow::Result;
use clap::Parser;

mod cli;
mod core;
mod finder;
mod output;
mod pipeline;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::run(cli)
}
