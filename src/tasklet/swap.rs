//! # Swap Tasklet
//!
//! Copies a fully written staging file back over the original input of an
//! in-place run.
//!
//! The staging file is rewound, the original is truncated to zero length and
//! rewound, then every staged byte is copied across. A failure before the
//! truncation leaves the original intact; a failure after it leaves the
//! original partially written or empty.

use std::{
    fs::File,
    io::{self, Seek, SeekFrom},
    path::{Path, PathBuf},
};

use log::debug;

use crate::CleanError;

pub struct SwapTasklet<'a> {
    original: &'a File,
    original_path: PathBuf,
    staged: &'a File,
    staged_path: PathBuf,
}

impl<'a> SwapTasklet<'a> {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(
        original: &'a File,
        original_path: P,
        staged: &'a File,
        staged_path: Q,
    ) -> Self {
        Self {
            original,
            original_path: original_path.as_ref().to_path_buf(),
            staged,
            staged_path: staged_path.as_ref().to_path_buf(),
        }
    }

    /// Replaces the content of the original file with the staged content.
    ///
    /// Returns the number of bytes copied.
    pub fn execute(&self) -> Result<u64, CleanError> {
        let mut staged = self.staged;
        let mut original = self.original;

        staged.seek(SeekFrom::Start(0)).map_err(|error| {
            CleanError::io("seeking to beginning of temp file", &self.staged_path, error)
        })?;

        original
            .set_len(0)
            .map_err(|error| CleanError::io("truncating input file", &self.original_path, error))?;
        original
            .seek(SeekFrom::Start(0))
            .map_err(|error| CleanError::io("rewinding input file", &self.original_path, error))?;

        let copied = io::copy(&mut staged, &mut original).map_err(|error| {
            CleanError::io(
                "overwriting input file with data from temp file",
                &self.original_path,
                error,
            )
        })?;

        debug!(
            "Copied {} bytes from {:?} over {:?}",
            copied, self.staged_path, self.original_path
        );

        Ok(copied)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        error::Error,
        fs::{self, OpenOptions},
        io::{Read, Write},
    };

    use tempfile::{tempdir, NamedTempFile};

    use super::SwapTasklet;

    #[test]
    fn shorter_content_replaces_original_without_leftovers() -> Result<(), Box<dyn Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("data.csv");
        fs::write(&path, "a much longer original content\n")?;

        let mut original = OpenOptions::new().read(true).write(true).open(&path)?;
        // leave the cursor at the end, as a finished reader would
        let mut drained = String::new();
        original.read_to_string(&mut drained)?;

        let mut staged = NamedTempFile::new()?;
        staged.write_all(b"short\n")?;

        let copied = SwapTasklet::new(&original, &path, staged.as_file(), staged.path()).execute()?;

        assert_eq!(copied, 6);
        assert_eq!(fs::read_to_string(&path)?, "short\n");
        Ok(())
    }

    #[test]
    fn read_only_original_fails_before_copying() -> Result<(), Box<dyn Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("data.csv");
        fs::write(&path, "keep me\n")?;

        let original = OpenOptions::new().read(true).open(&path)?;
        let mut staged = NamedTempFile::new()?;
        staged.write_all(b"new\n")?;

        let result = SwapTasklet::new(&original, &path, staged.as_file(), staged.path()).execute();

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path)?, "keep me\n");
        Ok(())
    }
}
