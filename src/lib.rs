/*!
 # csvclean

 A simple character separated value escape utility.

 `csvclean` rewrites a delimited text file, wrapping every field in an
 encapsulation character while optionally copying a header row through
 untouched. Output goes to a separate file (explicit, or `<name>_clean.<ext>`
 next to the input) or replaces the input in place through a temporary file.
 A run can be interrupted: it stops after the record in flight and exits
 cleanly with the records written so far.

 ## Core Concepts

 - **ItemReader:** yields one delimited record at a time.
 - **ItemProcessor:** turns a record into its output form; here, wraps fields.
 - **ItemWriter:** writes processed records, joined by the delimiter.
 - **Step:** the record-at-a-time loop tying the three together, checking a
   cancellation token between records.
 - **CleanJob:** one run: open the files, execute the step, swap the staged
   output back when running in place.
 - **Coordinator:** runs a job in the background and races it against an
   interrupt.

 ## Getting Started

```rust
use std::{fs, sync::Arc};

use csvclean::{
    config::ConfigBuilder,
    core::{cancel::CancellationToken, counter::LineCounter, job::CleanJob},
};

# fn main() -> Result<(), Box<dyn std::error::Error>> {
let dir = tempfile::tempdir()?;
let input = dir.path().join("cars.csv");
fs::write(&input, "year,make\n1948,Porsche\n")?;

let config = ConfigBuilder::new(&input).has_header(true).build()?;
let counter = Arc::new(LineCounter::new());
let job = CleanJob::new(config, CancellationToken::new(), Arc::clone(&counter));
job.run()?;

assert_eq!(counter.get(), 2);
assert_eq!(
    fs::read_to_string(dir.path().join("cars_clean.csv"))?,
    "year,make\n\"1948\",\"Porsche\"\n"
);
# Ok(())
# }
```

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.
 */

/// Command line parsing
pub mod cli;

/// Validated run configuration
pub mod config;

/// Pipeline traits, step, job and coordinator
pub mod core;

/// Error types
pub mod error;

#[doc(inline)]
pub use error::*;

/// Input and output file handles
pub mod files;

/// Readers, writers and processors
pub mod item;

/// Logger setup
pub mod logging;

/// File operations run after the pipeline
pub mod tasklet;
