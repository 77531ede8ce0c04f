use std::{
    cell::{Cell, RefCell},
    io::{self, Write},
    path::{Path, PathBuf},
};

use csv::{QuoteStyle, StringRecord, Terminator, Writer, WriterBuilder};

use crate::{
    CleanError,
    core::item::{ItemWriter, ItemWriterResult},
};

/// Writes records as `field<delim>field...\n`.
///
/// Fields are written verbatim: the writer never adds or escapes quotes, so
/// whatever encapsulation the processor applied is exactly what lands in the file.
pub struct CsvItemWriter<T: Write> {
    wrapper: RefCell<Writer<T>>,
    target_path: PathBuf,
    /// Number of the line currently being written, 1-based
    line: Cell<u64>,
}

impl<T: Write> ItemWriter<StringRecord> for CsvItemWriter<T> {
    fn write(&self, item: &StringRecord) -> ItemWriterResult {
        let line = self.line.get() + 1;
        self.line.set(line);

        let mut wtr = self.wrapper.borrow_mut();
        let written = if is_single_empty_field(item) {
            // the csv writer would emit `""` here
            wtr.flush()
                .and_then(|()| wtr.get_mut().write_all(b"\n"))
                .map_err(csv::Error::from)
        } else {
            wtr.write_record(item)
        };

        written.map_err(|error| CleanError::ItemWriter {
            line,
            path: self.target_path.clone(),
            source: error,
        })
    }

    fn flush(&self) -> ItemWriterResult {
        self.wrapper
            .borrow_mut()
            .flush()
            .map_err(|error| CleanError::io("flushing output file", &self.target_path, error))
    }
}

impl<T: Write> CsvItemWriter<T> {
    pub fn into_inner(self) -> Result<T, CleanError> {
        let target_path = self.target_path;
        self.wrapper.into_inner().into_inner().map_err(|error| {
            CleanError::io(
                "flushing output file",
                target_path,
                io::Error::new(error.error().kind(), error.error().to_string()),
            )
        })
    }
}

fn is_single_empty_field(item: &StringRecord) -> bool {
    item.len() == 1 && item.get(0) == Some("")
}

pub struct CsvItemWriterBuilder {
    delimiter: u8,
    target_path: PathBuf,
}

impl Default for CsvItemWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvItemWriterBuilder {
    pub fn new() -> CsvItemWriterBuilder {
        CsvItemWriterBuilder {
            delimiter: b',',
            target_path: PathBuf::from("<output>"),
        }
    }

    pub fn delimiter(mut self, delimiter: u8) -> CsvItemWriterBuilder {
        self.delimiter = delimiter;
        self
    }

    /// Path used to label write errors.
    pub fn target_path<P: AsRef<Path>>(mut self, path: P) -> CsvItemWriterBuilder {
        self.target_path = path.as_ref().to_path_buf();
        self
    }

    pub fn from_writer<W: io::Write>(self, wtr: W) -> CsvItemWriter<W> {
        let wtr = WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .flexible(true)
            .has_headers(false)
            .from_writer(wtr);

        CsvItemWriter {
            wrapper: RefCell::new(wtr),
            target_path: self.target_path,
            line: Cell::new(0),
        }
    }
}
