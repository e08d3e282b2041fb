//! Reading calendars from a directory of RFC 5545 (.ics) files.

pub mod import;
mod provider;
mod recurrence;
mod utils;

use std::path::PathBuf;

use thiserror::Error;

pub use provider::IcsDirectoryProvider;

#[derive(Debug, Error)]
pub enum IcsError {
    #[error("invalid date value '{0}'")]
    InvalidDate(String),

    #[error("invalid date-time value '{0}'")]
    InvalidDateTime(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
