#![allow(dead_code)]

mod mocks;

pub use mocks::MockFile;

use std::{
    fs,
    path::{Path, PathBuf},
};

use rand::distr::{Alphanumeric, SampleString};

/// Random file name with the given extension, unique enough to share a directory.
pub fn random_name(extension: &str) -> String {
    format!(
        "{}.{}",
        Alphanumeric.sample_string(&mut rand::rng(), 16),
        extension
    )
}

/// Writes `content` to `dir/name` and returns the path.
pub fn write_input(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write input file");
    path
}

/// Temp files left behind by in-place runs on `basename`.
pub fn leftover_temp_files(basename: &str) -> Vec<PathBuf> {
    let suffix = format!(".{}", basename);
    fs::read_dir(std::env::temp_dir())
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| {
                    path.file_name()
                        .and_then(|name| name.to_str())
                        .is_some_and(|name| name.starts_with("csvclean.") && name.ends_with(&suffix))
                })
                .collect()
        })
        .unwrap_or_default()
}
