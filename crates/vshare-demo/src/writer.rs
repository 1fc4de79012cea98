//! # Writer
//!
//! Appends one [`SharedRecord`] per tick to the shared log.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use vshare_config::{log_writer_debug, log_writer_info, log_writer_warn, Config};

use crate::error::TickError;
use crate::record::SharedRecord;
use crate::ticker::{self, Tick};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriterSummary {
    pub written: u32,
    pub failed: u32,
}

/// Append `record` as one line, creating the file if needed.
///
/// The line goes out in a single `write_all` on an `O_APPEND` handle.
pub fn append_record(path: &Path, record: &SharedRecord) -> Result<(), TickError> {
    let append_err = |source| TickError::Append {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(append_err)?;
    file.write_all(record.to_line().as_bytes())
        .map_err(append_err)?;
    Ok(())
}

fn write_tick<W: Write>(
    config: &Config,
    tick: Tick,
    out: &mut W,
    summary: &mut WriterSummary,
) -> Result<()> {
    let record = SharedRecord::now(&config.identity, tick.iteration, tick.total);

    match append_record(&config.shared_file, &record) {
        Ok(()) => {
            summary.written += 1;
            log_writer_debug!("Appended record", iteration = tick.iteration);
            writeln!(out, "Written: {}", record)?;
        }
        Err(e) => {
            summary.failed += 1;
            log_writer_warn!(
                "Append failed",
                iteration = tick.iteration,
                error = tracing::field::display(&e),
            );
            writeln!(out, "Error writing to file: {}", e)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Run the writer role to completion, including the trailing idle.
///
/// Only a failure to create the shared directory (or to write status output)
/// is fatal; append failures are counted and the loop moves on.
pub fn run_writer<W: Write>(config: &Config, out: &mut W) -> Result<WriterSummary> {
    if let Some(dir) = config.shared_dir() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create shared directory: {}", dir.display()))?;
        log_writer_info!("Shared directory ready", dir = tracing::field::debug(dir));
    }

    let schedule = config.schedule;
    writeln!(
        out,
        "Starting WRITER on pod: {}, node: {}",
        config.identity.hostname, config.identity.node
    )?;
    writeln!(
        out,
        "Will write to {} every {:?} for {} iterations",
        config.shared_file.display(),
        schedule.interval,
        schedule.iterations
    )?;
    out.flush()?;

    let mut summary = WriterSummary::default();
    ticker::drive(&schedule, |tick| {
        write_tick(config, tick, &mut *out, &mut summary)
    })?;

    log_writer_info!(
        "Writer done",
        written = summary.written,
        failed = summary.failed
    );
    ticker::linger(out, "Writer", &schedule)?;
    Ok(summary)
}
