//! # vshare-demo
//!
//! Checks that a storage volume is really shared between nodes. A writer
//! process appends identity records to a file on the volume; reader processes
//! on other nodes follow the same file and print what shows up.
//!
//! ```ignore
//! let config = vshare_config::Config::load()?;
//! vshare_demo::run(&config, &mut std::io::stdout().lock())?;
//! ```

pub mod error;
pub mod reader;
pub mod record;
pub mod runner;
pub mod ticker;
pub mod writer;

pub use error::TickError;
pub use reader::{run_reader, Poll, ReadCursor, ReaderSummary};
pub use record::{RecordParseError, SharedRecord};
pub use runner::{run, Outcome};
pub use writer::{append_record, run_writer, WriterSummary};
