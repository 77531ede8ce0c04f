use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Terminator};
use std::{
    cell::RefCell,
    io::{self, Read},
    path::{Path, PathBuf},
};

use crate::{
    core::item::{ItemReader, ItemReaderResult},
    error::CleanError,
};

/// A CSV item reader yielding raw [`StringRecord`]s.
///
/// Fields are returned exactly as parsed: surrounding quotes are removed,
/// doubled quotes inside a quoted field are collapsed and nothing is trimmed.
/// Every record must have as many fields as the first one; a record that does
/// not is reported as a parse error with its position. So is a quoted field
/// still open when the input ends.
///
/// # Examples
///
/// ```
/// use csvclean::item::csv::csv_reader::CsvItemReaderBuilder;
/// use csvclean::core::item::ItemReader;
///
/// let data = "\
/// # exported by hand
/// city;pop
/// Boston;4628910
/// ";
///
/// let reader = CsvItemReaderBuilder::new()
///     .delimiter(b';')
///     .comment(Some(b'#'))
///     .from_reader(data.as_bytes());
///
/// let header = reader.read().unwrap().unwrap();
/// assert_eq!(header.get(0), Some("city"));
///
/// let record = reader.read().unwrap().unwrap();
/// assert_eq!(record.get(1), Some("4628910"));
///
/// assert!(reader.read().unwrap().is_none());
/// ```
pub struct CsvItemReader<R> {
    /// Iterator over the CSV records
    records: RefCell<StringRecordsIntoIter<QuoteTracker<R>>>,
    /// Path reported in parse errors
    source_path: PathBuf,
}

impl<R: Read> ItemReader<StringRecord> for CsvItemReader<R> {
    fn read(&self) -> ItemReaderResult<StringRecord> {
        let mut records = self.records.borrow_mut();
        match records.next() {
            Some(Ok(record)) => {
                if records.reader().get_ref().ended_in_quotes() {
                    return Err(self.unterminated(&record));
                }
                Ok(Some(record))
            }
            Some(Err(error)) => Err(CleanError::ItemReader {
                path: self.source_path.clone(),
                source: error,
            }),
            None => Ok(None),
        }
    }
}

impl<R> CsvItemReader<R> {
    fn unterminated(&self, record: &StringRecord) -> CleanError {
        let line = record.position().map_or(0, |position| position.line());
        CleanError::ItemReader {
            path: self.source_path.clone(),
            source: csv::Error::from(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "quoted field left open at end of input (record starting on line {})",
                    line
                ),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    StartRecord,
    StartField,
    InField,
    InQuotes,
    /// A quote seen inside quotes: either the closing one or the first half of `""`
    QuoteInQuotes,
    Comment,
}

/// Follows the quoting of every byte handed to the csv parser.
///
/// The csv parser accepts a quoted field that is never closed and returns the
/// rest of the input as its value. This reader sees the same bytes with the
/// same rules, so once the inner reader is exhausted it can tell whether the
/// last record ended inside quotes.
struct QuoteTracker<R> {
    inner: R,
    delimiter: u8,
    comment: Option<u8>,
    state: QuoteState,
    exhausted: bool,
}

impl<R> QuoteTracker<R> {
    fn new(inner: R, delimiter: u8, comment: Option<u8>) -> Self {
        Self {
            inner,
            delimiter,
            comment,
            state: QuoteState::StartRecord,
            exhausted: false,
        }
    }

    fn ended_in_quotes(&self) -> bool {
        self.exhausted && self.state == QuoteState::InQuotes
    }

    fn track(&mut self, byte: u8) {
        use QuoteState::*;

        let terminator = byte == b'\n' || byte == b'\r';
        self.state = match self.state {
            StartRecord if terminator => StartRecord,
            StartRecord if Some(byte) == self.comment => Comment,
            StartRecord | StartField if byte == b'"' => InQuotes,
            InQuotes if byte == b'"' => QuoteInQuotes,
            InQuotes => InQuotes,
            QuoteInQuotes if byte == b'"' => InQuotes,
            Comment if terminator => StartRecord,
            Comment => Comment,
            _ if terminator => StartRecord,
            _ if byte == self.delimiter => StartField,
            _ => InField,
        };
    }
}

impl<R: Read> Read for QuoteTracker<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        if read == 0 && !buf.is_empty() {
            self.exhausted = true;
        }
        for &byte in &buf[..read] {
            self.track(byte);
        }
        Ok(read)
    }
}

/// A builder for configuring CSV item reading.
///
/// # Default Configuration
///
/// - Delimiter: comma (,)
/// - Comment: none
/// - Quote: double quote, escaped by doubling
/// - Terminator: CRLF (accepts `\r\n`, `\n` and `\r`)
pub struct CsvItemReaderBuilder {
    delimiter: u8,
    comment: Option<u8>,
    source_path: PathBuf,
}

impl Default for CsvItemReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvItemReaderBuilder {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            comment: None,
            source_path: PathBuf::from("<input>"),
        }
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Lines starting with this byte are skipped entirely.
    pub fn comment(mut self, comment: Option<u8>) -> Self {
        self.comment = comment;
        self
    }

    /// Path used to label parse errors.
    pub fn source_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source_path = path.as_ref().to_path_buf();
        self
    }

    pub fn from_reader<R: Read>(self, rdr: R) -> CsvItemReader<R> {
        let rdr = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .comment(self.comment)
            .terminator(Terminator::CRLF)
            .has_headers(false) // the header record is handled by the processor
            .flexible(false)
            .from_reader(QuoteTracker::new(rdr, self.delimiter, self.comment));

        CsvItemReader {
            records: RefCell::new(rdr.into_records()),
            source_path: self.source_path,
        }
    }
}
