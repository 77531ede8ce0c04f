//! # File opening
//!
//! Resolves the input and output handles of a run from its [`Configuration`].
//!
//! - Normal mode opens the input read-only and the output write-only, creating
//!   it with the configured permission mask when absent and truncating it
//!   first when asked to.
//! - In-place mode opens the input read-write and stages output in a temporary
//!   file named `csvclean.<random>.<input basename>` in the system temp
//!   directory. The temporary file is removed when the handles are dropped.

use std::{
    env,
    fs::{File, OpenOptions},
    path::{Path, PathBuf},
};

use log::debug;
use tempfile::NamedTempFile;

use crate::{
    CleanError,
    config::{Configuration, OutputTarget},
};

/// Prefix of the temporary file used for in-place rewrites.
pub const TEMP_PREFIX: &str = "csvclean.";

pub enum Output {
    File { file: File, path: PathBuf },
    Staged(NamedTempFile),
}

impl Output {
    pub fn as_file(&self) -> &File {
        match self {
            Output::File { file, .. } => file,
            Output::Staged(temp) => temp.as_file(),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Output::File { path, .. } => path,
            Output::Staged(temp) => temp.path(),
        }
    }
}

/// Handles owned by a single run. Both are closed when this is dropped.
pub struct OpenedFiles {
    pub input: File,
    pub output: Output,
}

pub fn open_files(config: &Configuration) -> Result<OpenedFiles, CleanError> {
    debug!("Opening input file {:?}...", config.input);

    let input = OpenOptions::new()
        .read(true)
        .write(config.is_in_place())
        .open(&config.input)
        .map_err(|error| CleanError::io("opening input file", &config.input, error))?;

    let output = match &config.output {
        OutputTarget::InPlace => {
            debug!("In-place overwrite specified, opening temp file...");
            let suffix = format!(".{}", config.input_basename());
            let temp = tempfile::Builder::new()
                .prefix(TEMP_PREFIX)
                .suffix(&suffix)
                .tempfile_in(env::temp_dir())
                .map_err(|error| CleanError::io("opening temporary file in", env::temp_dir(), error))?;
            debug!("Staging output in {:?}", temp.path());
            Output::Staged(temp)
        }
        OutputTarget::File(path) => {
            debug!(
                "Opening output file {:?} (truncate: {}, mode: {:o})...",
                path, config.truncate, config.permissions
            );
            let file = output_options(config)
                .open(path)
                .map_err(|error| CleanError::io("opening output file", path, error))?;
            Output::File {
                file,
                path: path.clone(),
            }
        }
    };

    Ok(OpenedFiles { input, output })
}

fn output_options(config: &Configuration) -> OpenOptions {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(config.truncate);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(config.permissions);
    }

    options
}
