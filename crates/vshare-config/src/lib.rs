//! # vshare-config
//!
//! Configuration for the vshare shared-volume demo.
//!
//! Resolution order:
//! 1. Built-in defaults (fixed schedule, `/mnt/shared/output.txt`)
//! 2. Environment variables (`ROLE`, `NODE_NAME`, `POD_NAME`, `VSHARE_SHARED_FILE`)
//!
//! Command-line flags are applied on top by the binary.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

pub mod logging;
pub mod testing;

/// Ticks per run.
pub const DEFAULT_ITERATIONS: u32 = 40;
/// Pause between two ticks.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(15);
/// Idle period after the last tick so logs can be collected.
pub const DEFAULT_LINGER: Duration = Duration::from_secs(300);

/// Well-known mount point of the shared volume.
pub const DEFAULT_SHARED_DIR: &str = "/mnt/shared";
pub const DEFAULT_SHARED_FILE_NAME: &str = "output.txt";

pub const UNKNOWN_NODE: &str = "unknown-node";
pub const UNKNOWN_POD: &str = "unknown";
pub const UNKNOWN_HOST: &str = "unknown-host";

pub const ENV_ROLE: &str = "ROLE";
pub const ENV_NODE_NAME: &str = "NODE_NAME";
pub const ENV_POD_NAME: &str = "POD_NAME";
pub const ENV_SHARED_FILE: &str = "VSHARE_SHARED_FILE";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("shared file path has no file name: {0}")]
    InvalidSharedFile(PathBuf),
}

/// Which half of the demo this process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    Writer,
    Reader,
}

impl Role {
    /// Parse a role selector, ignoring case. Returns `None` for anything unknown.
    pub fn parse(selector: &str) -> Option<Self> {
        match selector.to_ascii_lowercase().as_str() {
            "writer" => Some(Role::Writer),
            "reader" => Some(Role::Reader),
            _ => None,
        }
    }

    /// Resolve an optional selector. Absent and unrecognized values both mean writer.
    pub fn from_selector(selector: Option<&str>) -> Self {
        match selector {
            None => Role::Writer,
            Some(s) => Role::parse(s).unwrap_or_else(|| {
                warn!(selector = s, "Unrecognized role, falling back to writer");
                Role::Writer
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Writer => "writer",
            Role::Reader => "reader",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who is running: embedded in every record and in the startup banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub hostname: String,
    pub node: String,
    /// Display-only
    pub pod: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            hostname: UNKNOWN_HOST.to_string(),
            node: UNKNOWN_NODE.to_string(),
            pod: UNKNOWN_POD.to_string(),
        }
    }
}

impl Identity {
    /// Identity of the current machine with default node/pod names.
    pub fn local() -> Self {
        Self {
            hostname: local_hostname(),
            ..Self::default()
        }
    }
}

fn local_hostname() -> String {
    match nix::unistd::gethostname() {
        Ok(name) => name.to_string_lossy().into_owned(),
        Err(e) => {
            warn!(error = %e, "Failed to read hostname");
            UNKNOWN_HOST.to_string()
        }
    }
}

/// Outer loop shape shared by both roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub iterations: u32,
    pub interval: Duration,
    pub linger: Duration,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            interval: DEFAULT_INTERVAL,
            linger: DEFAULT_LINGER,
        }
    }
}

impl Schedule {
    pub fn new(iterations: u32, interval: Duration, linger: Duration) -> Self {
        Self {
            iterations,
            interval,
            linger,
        }
    }

    /// `iterations` ticks with no sleeping at all.
    pub fn immediate(iterations: u32) -> Self {
        Self::new(iterations, Duration::ZERO, Duration::ZERO)
    }

    /// Wall time of a full run: sleeps between ticks plus the trailing idle.
    pub fn total_duration(&self) -> Duration {
        self.interval * self.iterations.saturating_sub(1) + self.linger
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub role: Role,
    pub identity: Identity,
    pub shared_file: PathBuf,
    pub schedule: Schedule,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            role: Role::default(),
            identity: Identity::default(),
            shared_file: default_shared_file(),
            schedule: Schedule::default(),
        }
    }
}

pub fn default_shared_file() -> PathBuf {
    Path::new(DEFAULT_SHARED_DIR).join(DEFAULT_SHARED_FILE_NAME)
}

impl Config {
    /// Load and validate config from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::resolve();
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus process environment, without validation.
    ///
    /// Callers layering further overrides (command-line flags) validate once
    /// they are done.
    pub fn resolve() -> Self {
        let mut config = Config {
            identity: Identity::local(),
            ..Config::default()
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Build a config from defaults plus an arbitrary key lookup.
    ///
    /// The hostname is taken from `hostname` rather than the machine.
    pub fn from_lookup<F>(hostname: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        config.identity.hostname = hostname.to_string();
        config.apply_env_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let selector = lookup(ENV_ROLE);
        self.role = Role::from_selector(selector.as_deref());
        if let Some(node) = lookup(ENV_NODE_NAME) {
            self.identity.node = node;
        }
        if let Some(pod) = lookup(ENV_POD_NAME) {
            self.identity.pod = pod;
        }
        if let Some(path) = lookup(ENV_SHARED_FILE).filter(|p| !p.is_empty()) {
            self.shared_file = PathBuf::from(path);
        }
        debug!(role = %self.role, shared_file = ?self.shared_file, "Resolved config");
    }

    /// The shared file must name a file so the writer has a directory to create.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shared_file.file_name().is_none() {
            return Err(ConfigError::InvalidSharedFile(self.shared_file.clone()));
        }
        Ok(())
    }

    /// Directory holding the shared file, if the path has one.
    pub fn shared_dir(&self) -> Option<&Path> {
        self.shared_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
    }
}
