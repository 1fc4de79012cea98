//! # Reader
//!
//! Follows the shared log with an in-memory byte cursor and prints whatever
//! was appended since the previous tick.

use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use anyhow::Result;
use vshare_config::{log_reader_debug, log_reader_info, log_reader_warn, Config};

use crate::error::TickError;
use crate::ticker::{self, Tick};

/// What one poll of the shared log observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poll {
    /// The log has not been created yet.
    Missing,
    /// Bytes appended since the last poll.
    Appended(Vec<u8>),
    /// The log reported growth but the read came back empty.
    Empty { position: u64 },
    /// Same length as last time.
    Unchanged { size: u64 },
    /// The log is shorter than the cursor; the cursor was rewound to 0.
    Truncated { size: u64 },
}

/// Byte offset into the shared log. Lives only in the reader's memory.
///
/// Never exceeds the log length observed by the last successful poll.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadCursor {
    position: u64,
}

impl ReadCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    /// Check the log once. On error the cursor is left where it was.
    pub fn poll(&mut self, path: &Path) -> Result<Poll, TickError> {
        let read_err = |source| TickError::Read {
            path: path.to_path_buf(),
            source,
        };

        let size = match fs::metadata(path) {
            Ok(metadata) => metadata.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Poll::Missing),
            Err(e) => return Err(read_err(e)),
        };

        if size == self.position {
            return Ok(Poll::Unchanged { size });
        }
        if size < self.position {
            self.position = 0;
            return Ok(Poll::Truncated { size });
        }

        let mut file = File::open(path).map_err(read_err)?;
        file.seek(SeekFrom::Start(self.position))
            .map_err(read_err)?;
        let mut appended = Vec::new();
        file.read_to_end(&mut appended).map_err(read_err)?;

        if appended.is_empty() {
            return Ok(Poll::Empty {
                position: self.position,
            });
        }
        self.position += appended.len() as u64;
        Ok(Poll::Appended(appended))
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReaderSummary {
    /// Ticks that printed new content
    pub reads: u32,
    pub bytes_read: u64,
    pub failed: u32,
    /// Cursor position at the end of the run
    pub position: u64,
}

fn report_poll<W: Write>(
    out: &mut W,
    tick: Tick,
    polled: Result<Poll, TickError>,
    summary: &mut ReaderSummary,
) -> io::Result<()> {
    match polled {
        Ok(Poll::Missing) => {
            writeln!(out, "[Iteration {}] File does not exist yet, waiting...", tick)?;
        }
        Ok(Poll::Appended(bytes)) => {
            summary.reads += 1;
            summary.bytes_read += bytes.len() as u64;
            log_reader_debug!("Read new content", bytes = bytes.len());
            writeln!(out, "[Iteration {}] New content read:", tick)?;
            writeln!(out, "{}", String::from_utf8_lossy(&bytes).trim_end())?;
        }
        Ok(Poll::Empty { position }) => {
            writeln!(
                out,
                "[Iteration {}] No new content (position: {})",
                tick, position
            )?;
        }
        Ok(Poll::Unchanged { size }) => {
            writeln!(out, "[Iteration {}] No changes (size: {} bytes)", tick, size)?;
        }
        Ok(Poll::Truncated { size }) => {
            log_reader_warn!("Shared log shrank below cursor", size = size);
            writeln!(
                out,
                "[Iteration {}] File shrank to {} bytes, rewinding",
                tick, size
            )?;
        }
        Err(e) => {
            summary.failed += 1;
            log_reader_warn!(
                "Read failed",
                iteration = tick.iteration,
                error = tracing::field::display(&e),
            );
            writeln!(out, "[Iteration {}] Error reading file: {}", tick, e)?;
        }
    }
    out.flush()
}

/// Run the reader role to completion, including the trailing idle.
pub fn run_reader<W: Write>(config: &Config, out: &mut W) -> Result<ReaderSummary> {
    let schedule = config.schedule;
    let path = config.shared_file.as_path();

    writeln!(
        out,
        "Starting READER on pod: {}, node: {}",
        config.identity.hostname, config.identity.node
    )?;
    writeln!(
        out,
        "Will read from {} every {:?} for {} iterations",
        path.display(),
        schedule.interval,
        schedule.iterations
    )?;
    out.flush()?;

    let mut cursor = ReadCursor::new();
    let mut summary = ReaderSummary::default();
    ticker::drive(&schedule, |tick| {
        let polled = cursor.poll(path);
        report_poll(&mut *out, tick, polled, &mut summary)?;
        Ok(())
    })?;
    summary.position = cursor.position();

    log_reader_info!(
        "Reader done",
        reads = summary.reads,
        bytes_read = summary.bytes_read,
        failed = summary.failed,
    );
    ticker::linger(out, "Reader", &schedule)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_not_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("output.txt");
        let mut cursor = ReadCursor::new();

        assert_eq!(cursor.poll(&path).unwrap(), Poll::Missing);
        assert_eq!(cursor.poll(&path).unwrap(), Poll::Missing);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_first_poll_reads_everything() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("output.txt");
        std::fs::write(&path, b"a\nbb\nccc\n").unwrap();
        let mut cursor = ReadCursor::new();

        assert_eq!(
            cursor.poll(&path).unwrap(),
            Poll::Appended(b"a\nbb\nccc\n".to_vec())
        );
        assert_eq!(cursor.position(), 9);
    }

    #[test]
    fn test_unchanged_file_reports_size() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("output.txt");
        std::fs::write(&path, b"line\n").unwrap();
        let mut cursor = ReadCursor::new();
        cursor.poll(&path).unwrap();

        assert_eq!(cursor.poll(&path).unwrap(), Poll::Unchanged { size: 5 });
        assert_eq!(cursor.position(), 5);
    }

    #[test]
    fn test_empty_file_is_unchanged() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("output.txt");
        std::fs::write(&path, b"").unwrap();
        let mut cursor = ReadCursor::new();

        assert_eq!(cursor.poll(&path).unwrap(), Poll::Unchanged { size: 0 });
    }

    #[test]
    fn test_only_new_bytes_are_returned() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("output.txt");
        std::fs::write(&path, b"first\n").unwrap();
        let mut cursor = ReadCursor::new();
        cursor.poll(&path).unwrap();

        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .unwrap();
        file.write_all(b"second\n").unwrap();

        assert_eq!(
            cursor.poll(&path).unwrap(),
            Poll::Appended(b"second\n".to_vec())
        );
        assert_eq!(cursor.position(), 13);
    }

    #[test]
    fn test_truncation_rewinds_cursor() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("output.txt");
        std::fs::write(&path, b"0123456789").unwrap();
        let mut cursor = ReadCursor::new();
        cursor.poll(&path).unwrap();

        std::fs::write(&path, b"abc").unwrap();
        assert_eq!(cursor.poll(&path).unwrap(), Poll::Truncated { size: 3 });
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.poll(&path).unwrap(), Poll::Appended(b"abc".to_vec()));
    }

    #[test]
    fn test_read_error_leaves_cursor_alone() {
        let temp = tempdir().unwrap();
        // A non-empty directory has a non-zero size but cannot be read as a file
        let path = temp.path().join("output.txt");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("child"), b"x").unwrap();
        let mut cursor = ReadCursor::new();

        let err = cursor.poll(&path).unwrap_err();
        assert!(matches!(err, TickError::Read { .. }));
        assert!(err.to_string().contains("output.txt"));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_report_empty_read_shows_position() {
        let tick = Tick {
            iteration: 4,
            total: 40,
        };
        let mut summary = ReaderSummary::default();
        let mut out = Vec::new();

        report_poll(&mut out, tick, Ok(Poll::Empty { position: 128 }), &mut summary).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[Iteration 4/40] No new content (position: 128)\n"
        );
        assert_eq!(summary, ReaderSummary::default());
    }

    #[test]
    fn test_run_reader_waits_for_missing_file() {
        let temp = tempdir().unwrap();
        let config = Config {
            shared_file: temp.path().join("never.txt"),
            schedule: vshare_config::Schedule::immediate(3),
            ..Config::default()
        };
        let mut out = Vec::new();

        let summary = run_reader(&config, &mut out).unwrap();

        assert_eq!(summary, ReaderSummary::default());
        let output = String::from_utf8(out).unwrap();
        assert_eq!(output.matches("File does not exist yet").count(), 3);
        assert!(output.contains("[Iteration 3/3]"));
        assert!(output.contains("Reader finished."));
    }

    #[test]
    fn test_run_reader_counts_errors() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("output.txt");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("child"), b"x").unwrap();
        let config = Config {
            shared_file: path,
            schedule: vshare_config::Schedule::immediate(2),
            ..Config::default()
        };
        let mut out = Vec::new();

        let summary = run_reader(&config, &mut out).unwrap();

        assert_eq!(summary.failed, 2);
        assert_eq!(summary.position, 0);
        let output = String::from_utf8(out).unwrap();
        assert_eq!(output.matches("Error reading file: ").count(), 2);
    }
}
