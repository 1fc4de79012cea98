//! Test environment abstraction for isolated testing.
//!
//! Provides `TestEnvironment` to manage:
//! - A temporary stand-in for the shared mount
//! - Fast configs (no sleeping) for either role
//!
//! # Usage
//!
//! ```ignore
//! use vshare_config::{testing::TestEnvironment, Role};
//!
//! let env = TestEnvironment::new().unwrap();
//! let config = env.config(Role::Writer, 3);
//! // config.shared_file lives under env.shared_dir, which does not exist yet
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use tempfile::TempDir;

use crate::{Config, Identity, Role, Schedule, DEFAULT_SHARED_FILE_NAME};

/// Atomic counter for unique test IDs
static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Isolated test environment with a private shared directory
pub struct TestEnvironment {
    /// Temporary directory (dropped on cleanup)
    _temp_dir: TempDir,
    /// Stand-in for the shared mount; not created until a writer runs
    pub shared_dir: PathBuf,
    /// Shared log path inside `shared_dir`
    pub shared_file: PathBuf,
    /// Unique test ID
    pub test_id: u32,
}

impl TestEnvironment {
    /// Create a new isolated test environment
    pub fn new() -> anyhow::Result<Self> {
        let test_id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
        let temp_dir = TempDir::new()?;

        let shared_dir = temp_dir.path().join(format!("mnt-{}", test_id)).join("shared");
        let shared_file = shared_dir.join(DEFAULT_SHARED_FILE_NAME);

        Ok(Self {
            _temp_dir: temp_dir,
            shared_dir,
            shared_file,
            test_id,
        })
    }

    /// Identity stamped into records written from this environment
    pub fn identity(&self) -> Identity {
        Identity {
            hostname: format!("test-host-{}", self.test_id),
            node: "test-node".to_string(),
            pod: format!("test-pod-{}", self.test_id),
        }
    }

    /// Config for `role` running `iterations` ticks without sleeping
    pub fn config(&self, role: Role, iterations: u32) -> Config {
        Config {
            role,
            identity: self.identity(),
            shared_file: self.shared_file.clone(),
            schedule: Schedule::immediate(iterations),
        }
    }

    /// Append raw bytes to the shared file, creating it if needed
    pub fn append(&self, content: &[u8]) -> anyhow::Result<()> {
        use std::io::Write;

        std::fs::create_dir_all(&self.shared_dir)?;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.shared_file)?;
        file.write_all(content)?;
        Ok(())
    }

    /// Current content of the shared file
    pub fn read_shared(&self) -> anyhow::Result<Vec<u8>> {
        Ok(std::fs::read(&self.shared_file)?)
    }

    /// Check if the shared file exists
    pub fn is_shared_present(&self) -> bool {
        self.shared_file.exists()
    }
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new().expect("Failed to create test environment")
    }
}
