//! Startup banner and role dispatch.

use std::io::{self, Write};

use anyhow::Result;
use vshare_config::{log_runner_info, Config, Role};

use crate::reader::{run_reader, ReaderSummary};
use crate::writer::{run_writer, WriterSummary};

const RULE: &str = "========================================";

/// What a finished run did, by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Writer(WriterSummary),
    Reader(ReaderSummary),
}

pub fn print_banner<W: Write>(out: &mut W, config: &Config) -> io::Result<()> {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Storage Demo Application Starting")?;
    writeln!(out, "Role: {}", config.role)?;
    writeln!(out, "Hostname: {}", config.identity.hostname)?;
    writeln!(out, "Node: {}", config.identity.node)?;
    writeln!(out, "Pod: {}", config.identity.pod)?;
    writeln!(out, "{}", RULE)?;
    out.flush()
}

/// Print the banner and run the configured role to completion.
pub fn run<W: Write>(config: &Config, out: &mut W) -> Result<Outcome> {
    print_banner(out, config)?;
    log_runner_info!(
        "Dispatching",
        role = config.role.as_str(),
        shared_file = tracing::field::debug(&config.shared_file),
        total_secs = config.schedule.total_duration().as_secs(),
    );

    match config.role {
        Role::Writer => run_writer(config, out).map(Outcome::Writer),
        Role::Reader => run_reader(config, out).map(Outcome::Reader),
    }
}
