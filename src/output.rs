//! Bundle rendering and delivery
//!
//! Records are concatenated in arrival order into one text buffer, then
//! handed to a sink. The sink is deliberately narrow: bytes in, stored
//! somewhere.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::pipeline::ContentRecord;

/// Append one record to the bundle as a `-- <path> --` block
pub fn push_record(bundle: &mut String, record: &ContentRecord) {
    bundle.push_str("-- ");
    bundle.push_str(&record.path);
    bundle.push_str(" --\n");
    bundle.push_str(&record.content);
    bundle.push_str("\n\n");
}

/// Destination for the finished bundle
pub trait Sink {
    fn store(&mut self, bytes: &[u8]) -> Result<()>;
}

/// Write the bundle to stdout
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn store(&mut self, bytes: &[u8]) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(bytes).context("writing bundle to stdout")?;
        stdout.flush().context("flushing stdout")?;
        Ok(())
    }
}

/// Write the bundle to a file
pub struct FileSink(pub PathBuf);

impl Sink for FileSink {
    fn store(&mut self, bytes: &[u8]) -> Result<()> {
        fs::write(&self.0, bytes)
            .with_context(|| format!("writing bundle to {}", self.0.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_block_format() {
        let mut bundle = String::new();
        push_record(
            &mut bundle,
            &ContentRecord {
                path: "src/main.rs".to_string(),
                content: "fn main() {}".to_string(),
            },
        );

        assert_eq!(bundle, "-- src/main.rs --\nfn main() {}\n\n");
    }

    #[test]
    fn test_records_concatenate_in_order() {
        let mut bundle = String::new();
        for (path, content) in [("a", "1"), ("b", "2")] {
            push_record(
                &mut bundle,
                &ContentRecord {
                    path: path.to_string(),
                    content: content.to_string(),
                },
            );
        }

        assert_eq!(bundle, "-- a --\n1\n\n-- b --\n2\n\n");
    }

    #[test]
    fn test_file_sink_writes_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("bundle.txt");

        let mut sink = FileSink(target.clone());
        sink.store(b"-- a --\n1\n\n").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"-- a --\n1\n\n");
    }
}
