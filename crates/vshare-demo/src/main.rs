//! # vshare
//!
//! Shared-volume visibility demo. Run one writer and any number of readers
//! against the same mount; the role comes from `ROLE` or `--role`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use vshare_config::logging::{init_logging, LogLevel};
use vshare_config::{log_runner_debug, Config, Role};

/// Append identity records to a shared file, or follow it from another node
#[derive(Parser)]
#[command(name = "vshare")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Role to run: writer or reader (overrides ROLE; unknown values mean writer)
    #[arg(long, value_name = "ROLE")]
    role: Option<String>,

    /// Shared log path (overrides VSHARE_SHARED_FILE)
    #[arg(long = "shared-file", value_name = "PATH")]
    shared_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }

    init_logging(LogLevel::Warn);

    let cli = Cli::parse();
    // Defaults, then environment, then flags; validated once at the end
    let mut config = Config::resolve();
    if let Some(role) = cli.role.as_deref() {
        config.role = Role::from_selector(Some(role));
    }
    if let Some(path) = cli.shared_file {
        config.shared_file = path;
    }
    config.validate().context("Invalid configuration")?;
    log_runner_debug!("Config resolved", role = config.role.as_str());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    vshare_demo::run(&config, &mut out)?;
    Ok(())
}
