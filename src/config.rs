//! # Configuration
//!
//! The validated settings of a clean run. A [`Configuration`] is produced once by
//! [`ConfigBuilder::build`] and is never mutated afterwards; every rule about
//! delimiters, comment markers and output paths is checked there, before any
//! file is touched.

use std::path::{Path, PathBuf};

use crate::CleanError;

/// Default field delimiter.
pub const DEFAULT_DELIMITER: &str = ",";
/// Default encapsulation character.
pub const DEFAULT_ENCAPSULATION: &str = "\"";
/// Default permission mask applied to a newly created output file.
pub const DEFAULT_PERMISSIONS: u32 = 0o666;
/// Marker inserted in front of the first extension of a derived output file name.
pub const CLEAN_SUFFIX: &str = "_clean";

const TAB_ALIAS: &str = "\\t";
const MAX_PERMISSIONS: u32 = 0o7777;

/// Where the rewritten records end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// A separate output file, explicit or derived from the input path.
    File(PathBuf),
    /// Staged in a temporary file, then copied back over the input.
    InPlace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub input: PathBuf,
    pub output: OutputTarget,
    pub delimiter: u8,
    pub comment: Option<u8>,
    pub encapsulation: String,
    pub has_header: bool,
    pub truncate: bool,
    pub permissions: u32,
    pub verbose: bool,
}

impl Configuration {
    pub fn is_in_place(&self) -> bool {
        self.output == OutputTarget::InPlace
    }

    /// File name of the input, used to label the staged temp file.
    pub fn input_basename(&self) -> String {
        self.input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Builder for [`Configuration`].
///
/// Raw flag values are stored as given and only resolved in [`ConfigBuilder::build`].
///
/// # Examples
///
/// ```
/// use csvclean::config::{ConfigBuilder, OutputTarget};
/// use std::path::PathBuf;
///
/// let config = ConfigBuilder::new("/tmp/foo/data.csv")
///     .delimiter("\\t")
///     .has_header(true)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.delimiter, b'\t');
/// assert_eq!(
///     config.output,
///     OutputTarget::File(PathBuf::from("/tmp/foo/data_clean.csv"))
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    input: PathBuf,
    output: Option<PathBuf>,
    delimiter: String,
    comment: String,
    encapsulation: String,
    has_header: bool,
    in_place: bool,
    truncate: bool,
    permissions: u32,
    verbose: bool,
}

impl ConfigBuilder {
    pub fn new<P: AsRef<Path>>(input: P) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: None,
            delimiter: DEFAULT_DELIMITER.to_string(),
            comment: String::new(),
            encapsulation: DEFAULT_ENCAPSULATION.to_string(),
            has_header: false,
            in_place: false,
            truncate: false,
            permissions: DEFAULT_PERMISSIONS,
            verbose: false,
        }
    }

    pub fn output<P: AsRef<Path>>(mut self, output: Option<P>) -> Self {
        self.output = output.map(|path| path.as_ref().to_path_buf());
        self
    }

    /// Sets the field delimiter: one ASCII character or the two-character `\t` alias.
    pub fn delimiter<S: Into<String>>(mut self, delimiter: S) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Sets the comment marker. An empty string disables comments.
    pub fn comment<S: Into<String>>(mut self, comment: S) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn encapsulation<S: Into<String>>(mut self, encapsulation: S) -> Self {
        self.encapsulation = encapsulation.into();
        self
    }

    pub fn has_header(mut self, yes: bool) -> Self {
        self.has_header = yes;
        self
    }

    pub fn in_place(mut self, yes: bool) -> Self {
        self.in_place = yes;
        self
    }

    /// Truncate the output file before writing. Has no effect in place.
    pub fn truncate(mut self, yes: bool) -> Self {
        self.truncate = yes;
        self
    }

    pub fn permissions(mut self, mode: u32) -> Self {
        self.permissions = mode;
        self
    }

    pub fn verbose(mut self, yes: bool) -> Self {
        self.verbose = yes;
        self
    }

    pub fn build(self) -> Result<Configuration, CleanError> {
        let delimiter = parse_delimiter(&self.delimiter)?;
        let comment = parse_comment(&self.comment)?;

        if self.permissions > MAX_PERMISSIONS {
            return Err(CleanError::Configuration(format!(
                "permission mask must not exceed {:o}, saw {:o}",
                MAX_PERMISSIONS, self.permissions
            )));
        }

        let output = match (self.in_place, self.output) {
            (true, Some(path)) => {
                return Err(CleanError::Usage(format!(
                    "outfile {:?} may not be specified together with -i",
                    path
                )));
            }
            (true, None) => OutputTarget::InPlace,
            (false, Some(path)) => OutputTarget::File(path),
            (false, None) => OutputTarget::File(derive_output_path(&self.input)?),
        };

        Ok(Configuration {
            input: self.input,
            output,
            delimiter,
            comment,
            encapsulation: self.encapsulation,
            has_header: self.has_header,
            truncate: self.truncate,
            permissions: self.permissions,
            verbose: self.verbose,
        })
    }
}

/// Resolves a raw delimiter flag into a single byte.
///
/// The literal two-character string `\t` maps to a tab.
pub fn parse_delimiter(raw: &str) -> Result<u8, CleanError> {
    if raw == TAB_ALIAS {
        return Ok(b'\t');
    }
    single_byte(raw).ok_or_else(|| {
        CleanError::Configuration(format!(
            "delimiter must be a single byte character, saw {:?}",
            raw
        ))
    })
}

/// Resolves a raw comment flag. Empty means comments are not recognised.
pub fn parse_comment(raw: &str) -> Result<Option<u8>, CleanError> {
    if raw.is_empty() {
        return Ok(None);
    }
    single_byte(raw).map(Some).ok_or_else(|| {
        CleanError::Configuration(format!(
            "comment marker must be a single byte character, saw {:?}",
            raw
        ))
    })
}

fn single_byte(raw: &str) -> Option<u8> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Some(c as u8),
        _ => None,
    }
}

/// Computes `<dir>/<name>_clean<ext>`, inserting the marker before the first `.`
/// of the input's file name.
///
/// # Examples
///
/// ```
/// use csvclean::config::derive_output_path;
/// use std::path::PathBuf;
///
/// let out = derive_output_path("archive/data.tar.gz").unwrap();
/// assert_eq!(out, PathBuf::from("archive/data_clean.tar.gz"));
/// ```
pub fn derive_output_path<P: AsRef<Path>>(input: P) -> Result<PathBuf, CleanError> {
    let input = input.as_ref();
    let basename = input
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            CleanError::Configuration(format!(
                "cannot derive an output file name from {:?}",
                input
            ))
        })?;

    let derived = match basename.split_once('.') {
        Some((stem, rest)) => format!("{}{}.{}", stem, CLEAN_SUFFIX, rest),
        None => format!("{}{}", basename, CLEAN_SUFFIX),
    };

    Ok(input.with_file_name(derived))
}
