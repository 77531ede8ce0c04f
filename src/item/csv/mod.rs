/// CSV support for the clean pipeline.
///
/// - [`csv_reader::CsvItemReader`] parses delimited records one at a time,
///   honouring the configured delimiter and comment marker.
/// - [`csv_writer::CsvItemWriter`] writes fields joined by the delimiter, one
///   record per line, without any quoting of its own.
///
/// Both are configured through builders.
///
/// # Example
///
/// ```
/// use csvclean::core::item::{ItemProcessor, ItemReader, ItemWriter};
/// use csvclean::item::csv::{csv_reader::CsvItemReaderBuilder, csv_writer::CsvItemWriterBuilder};
/// use csvclean::item::encapsulate::EncapsulateProcessor;
///
/// let reader = CsvItemReaderBuilder::new().from_reader("a,\"b,c\"\n".as_bytes());
/// let processor = EncapsulateProcessor::new("'", false);
/// let writer = CsvItemWriterBuilder::new().from_writer(Vec::new());
///
/// while let Some(record) = reader.read().unwrap() {
///     writer.write(&processor.process(&record).unwrap()).unwrap();
/// }
///
/// let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
/// assert_eq!(output, "'a','b,c'\n");
/// ```

/// A module providing facilities for reading CSV data records.
pub mod csv_reader;

/// A module providing facilities for writing CSV data records.
pub mod csv_writer;
