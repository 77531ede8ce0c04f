use crate::error::CleanError;

/// Result of a single read: `Ok(None)` once the source is exhausted.
pub type ItemReaderResult<R> = Result<Option<R>, CleanError>;

pub type ItemProcessorResult<W> = Result<W, CleanError>;

pub type ItemWriterResult = Result<(), CleanError>;

pub trait ItemReader<R> {
    fn read(&self) -> ItemReaderResult<R>;
}

pub trait ItemProcessor<R, W> {
    fn process(&self, item: &R) -> ItemProcessorResult<W>;
}

pub trait ItemWriter<W> {
    fn write(&self, item: &W) -> ItemWriterResult;
    fn flush(&self) -> ItemWriterResult;
    fn open(&self) -> ItemWriterResult {
        Ok(())
    }
    fn close(&self) -> ItemWriterResult {
        Ok(())
    }
}

