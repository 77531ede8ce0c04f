//! Command line surface.
//!
//! Flags follow the classic single-letter layout (`-h` marks a header, so help
//! is only available as `--help`). The positional arguments are collected
//! loosely and counted in [`Cli::into_config`] so a wrong count can be reported
//! together with the usage text.

use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser};

use crate::{
    CleanError,
    config::{ConfigBuilder, Configuration, DEFAULT_DELIMITER, DEFAULT_ENCAPSULATION},
};

const NOTES: &str = "\
If -i is specified, outfile may not be specified
If -i is NOT specified, outfile defaults to infile_clean.ext
-t and -p only function without -i";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "csvclean",
    version,
    about = "csvclean - simple character separated value escape utility",
    override_usage = "csvclean [options] infile [outfile]",
    after_help = NOTES,
    disable_help_flag = true
)]
pub struct Cli {
    /// Character comments are started with
    #[arg(short = 'c', value_name = "CHAR")]
    pub comment: Option<String>,

    /// Character values are separated by ("\t" for tab)
    #[arg(short = 'd', value_name = "CHAR", default_value = DEFAULT_DELIMITER)]
    pub delimiter: String,

    /// Character to encapsulate values with
    #[arg(short = 'e', value_name = "CHAR", default_value = DEFAULT_ENCAPSULATION)]
    pub encapsulation: String,

    /// Mark the input file as having a header
    #[arg(short = 'h')]
    pub header: bool,

    /// Overwrite source file with updated contents
    #[arg(short = 'i')]
    pub in_place: bool,

    /// Output file permission mask
    #[arg(short = 'p', value_name = "MODE", default_value = "0666", value_parser = parse_permissions)]
    pub permissions: u32,

    /// Truncate output file prior to writing
    #[arg(short = 't')]
    pub truncate: bool,

    /// Enable verbose logging
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,

    /// infile [outfile]
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

impl Cli {
    pub fn into_config(self) -> Result<Configuration, CleanError> {
        let (input, output) = match self.files.as_slice() {
            [input] => (input.clone(), None),
            [input, output] => (input.clone(), Some(output.clone())),
            files => {
                return Err(CleanError::Usage(format!(
                    "Invalid input provided: {:?}",
                    files
                )));
            }
        };

        ConfigBuilder::new(input)
            .output(output)
            .delimiter(self.delimiter)
            .comment(self.comment.unwrap_or_default())
            .encapsulation(self.encapsulation)
            .has_header(self.header)
            .in_place(self.in_place)
            .truncate(self.truncate)
            .permissions(self.permissions)
            .verbose(self.verbose)
            .build()
    }
}

/// Rendered help, printed next to usage errors.
pub fn help_text() -> String {
    Cli::command().render_help().to_string()
}

/// Parses an unsigned mode with the usual base prefixes: `0x` hex, `0o` or a
/// leading `0` octal, `0b` binary, decimal otherwise.
pub fn parse_permissions(raw: &str) -> Result<u32, String> {
    let lower = raw.to_ascii_lowercase();
    let (digits, radix) = if let Some(hex) = lower.strip_prefix("0x") {
        (hex, 16)
    } else if let Some(octal) = lower.strip_prefix("0o") {
        (octal, 8)
    } else if let Some(binary) = lower.strip_prefix("0b") {
        (binary, 2)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (&lower[1..], 8)
    } else {
        (lower.as_str(), 10)
    };

    u32::from_str_radix(digits, radix)
        .map_err(|error| format!("invalid permission mask {:?}: {}", raw, error))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::{Parser, error::ErrorKind};

    use super::{parse_permissions, Cli};
    use crate::{config::OutputTarget, CleanError};

    #[test]
    fn defaults_match_the_documented_ones() -> Result<(), Box<dyn std::error::Error>> {
        let config = Cli::try_parse_from(["csvclean", "/tmp/foo/data.csv"])?.into_config()?;

        assert_eq!(config.delimiter, b',');
        assert_eq!(config.encapsulation, "\"");
        assert_eq!(config.comment, None);
        assert_eq!(config.permissions, 0o666);
        assert_eq!(
            config.output,
            OutputTarget::File(PathBuf::from("/tmp/foo/data_clean.csv"))
        );
        Ok(())
    }

    #[test]
    fn short_flags_are_parsed() -> Result<(), Box<dyn std::error::Error>> {
        let cli = Cli::try_parse_from([
            "csvclean", "-h", "-t", "-v", "-d", "\\t", "-c", "#", "-e", "'", "-p", "0644",
            "in.tsv", "out.tsv",
        ])?;
        assert!(cli.header);

        let config = cli.into_config()?;
        assert!(config.has_header);
        assert!(config.truncate);
        assert!(config.verbose);
        assert_eq!(config.delimiter, b'\t');
        assert_eq!(config.comment, Some(b'#'));
        assert_eq!(config.encapsulation, "'");
        assert_eq!(config.permissions, 0o644);
        assert_eq!(config.output, OutputTarget::File(PathBuf::from("out.tsv")));
        Ok(())
    }

    #[test]
    fn wrong_positional_count_is_a_usage_error() -> Result<(), Box<dyn std::error::Error>> {
        let none = Cli::try_parse_from(["csvclean"])?.into_config();
        assert!(matches!(none, Err(CleanError::Usage(_))));

        let three = Cli::try_parse_from(["csvclean", "a", "b", "c"])?.into_config();
        assert!(matches!(three, Err(CleanError::Usage(_))));
        Ok(())
    }

    #[test]
    fn long_help_is_still_available() {
        let result = Cli::try_parse_from(["csvclean", "--help"]);
        assert!(matches!(result, Err(error) if error.kind() == ErrorKind::DisplayHelp));
    }

    #[test]
    fn permissions_accept_base_prefixes() {
        assert_eq!(parse_permissions("0666"), Ok(0o666));
        assert_eq!(parse_permissions("0o640"), Ok(0o640));
        assert_eq!(parse_permissions("0x1a4"), Ok(0o644));
        assert_eq!(parse_permissions("420"), Ok(0o644));
        assert_eq!(parse_permissions("0"), Ok(0));
        assert!(parse_permissions("0999").is_err());
        assert!(parse_permissions("rw").is_err());
    }
}
