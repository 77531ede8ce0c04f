use env_logger::{Builder, Target};
use log::LevelFilter;

/// Level used when no `RUST_LOG` override is present.
pub fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Installs the global logger, writing timestamped lines to standard output.
///
/// `-v` turns on debug diagnostics; `RUST_LOG` can refine levels further.
/// Calling it twice is harmless: the second initialisation is ignored.
pub fn init_logger(verbose: bool) {
    let _ = Builder::new()
        .target(Target::Stdout)
        .filter_level(default_level(verbose))
        .parse_default_env()
        .try_init();
}
