//! Structured logging utilities for vshare components.
//!
//! Status output for the operator goes to stdout; these macros produce
//! `tracing` diagnostics on stderr, tagged with a component field.
//!
//! # Usage
//!
//! ```ignore
//! use vshare_config::log_writer_warn;
//!
//! log_writer_warn!("Append failed", iteration = 3);
//! ```

/// Component identifiers for log filtering
pub struct Component;

impl Component {
    pub const WRITER: &'static str = "WRITER";
    pub const READER: &'static str = "READER";
    pub const RUNNER: &'static str = "RUNNER";
}

/// Log levels for runtime configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

// === WRITER logging macros ===

#[macro_export]
macro_rules! log_writer_warn {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::warn!(component = $crate::logging::Component::WRITER, $($key = $value,)* $msg)
    };
}

#[macro_export]
macro_rules! log_writer_info {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::info!(component = $crate::logging::Component::WRITER, $($key = $value,)* $msg)
    };
}

#[macro_export]
macro_rules! log_writer_debug {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::debug!(component = $crate::logging::Component::WRITER, $($key = $value,)* $msg)
    };
}

// === READER logging macros ===

#[macro_export]
macro_rules! log_reader_warn {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::warn!(component = $crate::logging::Component::READER, $($key = $value,)* $msg)
    };
}

#[macro_export]
macro_rules! log_reader_info {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::info!(component = $crate::logging::Component::READER, $($key = $value,)* $msg)
    };
}

#[macro_export]
macro_rules! log_reader_debug {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::debug!(component = $crate::logging::Component::READER, $($key = $value,)* $msg)
    };
}

// === RUNNER logging macros ===

#[macro_export]
macro_rules! log_runner_info {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::info!(component = $crate::logging::Component::RUNNER, $($key = $value,)* $msg)
    };
}

#[macro_export]
macro_rules! log_runner_debug {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::debug!(component = $crate::logging::Component::RUNNER, $($key = $value,)* $msg)
    };
}

/// Initialize logging with the given level filter.
/// Call this once at application startup.
///
/// `VSHARE_LOG` wins over `RUST_LOG`, which wins over `level`.
pub fn init_logging(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_env("VSHARE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
