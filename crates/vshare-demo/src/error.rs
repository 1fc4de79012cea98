use std::io;
use std::path::PathBuf;

/// A failure confined to one tick. Reported, never retried, never fatal.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    #[error("failed to append to {}: {source}", .path.display())]
    Append {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
