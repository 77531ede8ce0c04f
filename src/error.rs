use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
/// Errors raised while configuring or running a clean job
pub enum CleanError {
    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    Usage(String),

    #[error("error {action} {path:?}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error reading from input file {path:?}: {source}")]
    ItemReader {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("error writing line {line} to output file {path:?}: {source}")]
    ItemWriter {
        line: u64,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("run task failed: {0}")]
    Task(String),
}

impl CleanError {
    /// Wraps an I/O error with the action that failed and the file it touched.
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        CleanError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
