//! The append-only replay sink.
//!
//! [`ReplaySink`] streams newline-delimited, compact JSON records to any
//! `Write` sink — tests use `Vec<u8>`, production code wraps a
//! `BufWriter<File>`. Every
//! record is written with a single `write_all` call and flushed
//! immediately so a tailing reader observes it as soon as it lands and so
//! a partially-written process never corrupts more than the final line.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::ReplayError;
use crate::types::{Header, TickRecord};

/// An append-only, newline-delimited JSON replay sink.
pub struct ReplaySink<W: Write> {
    writer: W,
    records_written: u64,
}

impl ReplaySink<BufWriter<File>> {
    /// Create (truncating any existing file) a replay sink writing to `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> ReplaySink<W> {
    /// Wrap an arbitrary `Write` sink. Does not write anything yet; call
    /// [`Self::write_header`] first.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            records_written: 0,
        }
    }

    /// Write the replay header. Must be the first record written.
    pub fn write_header(&mut self, header: &Header) -> Result<(), ReplayError> {
        self.write_line(header)
    }

    /// Write one tick record.
    pub fn write_tick(&mut self, record: &TickRecord) -> Result<(), ReplayError> {
        self.write_line(record)
    }

    /// Number of records written so far, including the header.
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<(), ReplayError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Consume the sink and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Encode `record` as compact JSON, append a newline, and write it in
    /// one call. On I/O failure the write is retried exactly once before
    /// the error is propagated.
    fn write_line<T: Serialize>(&mut self, record: &T) -> Result<(), ReplayError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        match self.write_and_flush(&line) {
            Ok(()) => {
                self.records_written += 1;
                Ok(())
            }
            Err(_) => {
                self.write_and_flush(&line)?;
                self.records_written += 1;
                Ok(())
            }
        }
    }

    fn write_and_flush(&mut self, line: &[u8]) -> io::Result<()> {
        self.writer.write_all(line)?;
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::Config;
    use crate::types::ScoreMap;

    fn sample_tick(tick: u64) -> TickRecord {
        TickRecord {
            tick,
            agents: vec![],
            score: ScoreMap::new(),
            events: vec![],
            memory_diffs: vec![],
        }
    }

    #[test]
    fn header_is_the_first_line_written() {
        let mut sink = ReplaySink::new(Vec::new());
        sink.write_header(&Header::new(Config::default())).unwrap();
        let bytes = sink.into_inner();
        let text = String::from_utf8(bytes).unwrap();
        let first_line = text.lines().next().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(first_line).unwrap();
        assert_eq!(parsed["tick"], 0);
        assert_eq!(parsed["ver"], 6);
    }

    #[test]
    fn ticks_are_newline_delimited_in_order() {
        let mut sink = ReplaySink::new(Vec::new());
        sink.write_header(&Header::new(Config::default())).unwrap();
        sink.write_tick(&sample_tick(1)).unwrap();
        sink.write_tick(&sample_tick(2)).unwrap();
        let bytes = sink.into_inner();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        for line in &lines {
            assert!(!line.contains('\n'));
        }
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        let third: serde_json::Value = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(second["tick"], 1);
        assert_eq!(third["tick"], 2);
    }

    #[test]
    fn records_written_counts_header_and_ticks() {
        let mut sink = ReplaySink::new(Vec::new());
        sink.write_header(&Header::new(Config::default())).unwrap();
        sink.write_tick(&sample_tick(1)).unwrap();
        assert_eq!(sink.records_written(), 2);
    }

    #[test]
    fn records_use_compact_separators() {
        let mut sink = ReplaySink::new(Vec::new());
        sink.write_tick(&sample_tick(1)).unwrap();
        let bytes = sink.into_inner();
        let text = String::from_utf8(bytes).unwrap();
        assert!(!text.contains(", "));
        assert!(!text.contains(": "));
    }

    #[test]
    fn empty_score_map_serializes_as_empty_object() {
        let mut sink = ReplaySink::new(Vec::new());
        sink.write_tick(&sample_tick(1)).unwrap();
        let bytes = sink.into_inner();
        let text = String::from_utf8(bytes).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(text.trim_end()).unwrap();
        assert!(parsed["score"].is_object());
    }
}
