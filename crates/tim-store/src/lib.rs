//! File storage for the tim time log.
//!
//! Every store is a whole-object JSON document wrapped in a versioned
//! envelope:
//!
//! ```json
//! { "version": 1, "data": { ... } }
//! ```
//!
//! # Layout
//!
//! - Project store: one file holding a [`tim_core::ProjectTable`].
//! - Event store: one file holding a [`tim_core::EventTable`].
//! - Log store: a directory with one `YYYY-MM-DD.json` file per day, each
//!   holding a [`tim_core::Tim`].
//!
//! # Concurrency
//!
//! There is no locking and no atomic rename. Stores are loaded, mutated in
//! memory and written back whole; two processes writing the same file race
//! and the last writer wins. Callers must run one mutating command at a time.

mod logs;
mod record;

use std::path::PathBuf;

use thiserror::Error;

pub use logs::{LOG_EXTENSION, TimManager, parse_log_file_name};
pub use record::{FORMAT_VERSION, JsonStore};

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a store file failed.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A store file exists but does not hold the expected document.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Encoding a document failed.
    #[error("failed to serialize {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A store file was written by an incompatible format version.
    #[error("unsupported format version {found} in {}", path.display())]
    UnsupportedVersion { path: PathBuf, found: u32 },
    /// A log for this date is already loaded.
    #[error("a log for {0} already exists")]
    LogExists(String),
    /// No log is stored under this date key.
    #[error("no log for {0}")]
    LogNotFound(String),
}
