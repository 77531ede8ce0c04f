use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use log::{debug, warn};

use crate::CleanError;

use super::{
    cancel::CancellationToken,
    counter::LineCounter,
    item::{ItemProcessor, ItemReader, ItemWriter},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Every record of the source has been written.
    Completed,
    /// Stopped early on a cancellation request; output holds the records handled so far.
    Stopped,
}

#[derive(Debug, Clone)]
pub struct StepExecution {
    pub name: String,
    pub status: StepStatus,
    pub start_time: Instant,
    pub end_time: Instant,
    pub duration: Duration,
    /// Number of records read from the source, including one read but dropped on cancellation
    pub read_count: u64,
    /// Number of records written
    pub write_count: u64,
}

/// Record-at-a-time read/process/write loop.
///
/// Each iteration reads one record, then checks the cancellation token. A
/// cancelled step drops the record it just read and stops; otherwise the record
/// is counted, processed and written. The writer is flushed before the step
/// returns, including when it fails.
pub struct Step<'a, R, W> {
    name: String,
    reader: &'a dyn ItemReader<R>,
    processor: &'a dyn ItemProcessor<R, W>,
    writer: &'a dyn ItemWriter<W>,
    cancellation: CancellationToken,
    counter: Arc<LineCounter>,
}

impl<R, W> Step<'_, R, W> {
    pub fn execute(&self) -> Result<StepExecution, CleanError> {
        let start_time = Instant::now();

        debug!("Start of step: {}", self.name);

        self.writer.open()?;

        let mut read_count = 0;
        let mut write_count = 0;

        let outcome = self.run_loop(&mut read_count, &mut write_count);

        let outcome = match outcome {
            Ok(status) => self
                .writer
                .flush()
                .and_then(|()| self.writer.close())
                .map(|()| status),
            Err(error) => {
                if let Err(flush_error) = self.writer.flush() {
                    warn!("Unable to flush output after failure: {}", flush_error);
                }
                Err(error)
            }
        };

        let status = outcome?;

        debug!(
            "End of step: {}, status: {:?}, read: {}, written: {}",
            self.name, status, read_count, write_count
        );

        Ok(StepExecution {
            name: self.name.clone(),
            status,
            start_time,
            end_time: Instant::now(),
            duration: start_time.elapsed(),
            read_count,
            write_count,
        })
    }

    fn run_loop(&self, read_count: &mut u64, write_count: &mut u64) -> Result<StepStatus, CleanError> {
        loop {
            let Some(item) = self.reader.read()? else {
                return Ok(StepStatus::Completed);
            };
            *read_count += 1;

            if self.cancellation.is_cancelled() {
                debug!("Step {} stopped on request", self.name);
                return Ok(StepStatus::Stopped);
            }

            self.counter.increment();

            let processed = self.processor.process(&item)?;
            self.writer.write(&processed)?;
            *write_count += 1;
        }
    }
}

pub struct StepBuilder<'a, R, W> {
    name: String,
    reader: Option<&'a dyn ItemReader<R>>,
    processor: Option<&'a dyn ItemProcessor<R, W>>,
    writer: Option<&'a dyn ItemWriter<W>>,
    cancellation: CancellationToken,
    counter: Option<Arc<LineCounter>>,
}

impl<'a, R, W> StepBuilder<'a, R, W> {
    pub fn new(name: &str) -> StepBuilder<'a, R, W> {
        Self {
            name: name.to_string(),
            reader: None,
            processor: None,
            writer: None,
            cancellation: CancellationToken::new(),
            counter: None,
        }
    }

    pub fn reader(mut self, reader: &'a impl ItemReader<R>) -> StepBuilder<'a, R, W> {
        self.reader = Some(reader);
        self
    }

    pub fn processor(mut self, processor: &'a impl ItemProcessor<R, W>) -> StepBuilder<'a, R, W> {
        self.processor = Some(processor);
        self
    }

    pub fn writer(mut self, writer: &'a impl ItemWriter<W>) -> StepBuilder<'a, R, W> {
        self.writer = Some(writer);
        self
    }

    /// Token checked once per record.
    pub fn cancellation(mut self, token: CancellationToken) -> StepBuilder<'a, R, W> {
        self.cancellation = token;
        self
    }

    /// Counter incremented for every record handed to the processor.
    pub fn counter(mut self, counter: Arc<LineCounter>) -> StepBuilder<'a, R, W> {
        self.counter = Some(counter);
        self
    }

    pub fn build(self) -> Result<Step<'a, R, W>, CleanError> {
        let missing = |part: &str| {
            CleanError::Configuration(format!("{} is required for step {}", part, self.name))
        };

        let reader = self.reader.ok_or_else(|| missing("reader"))?;
        let processor = self.processor.ok_or_else(|| missing("processor"))?;
        let writer = self.writer.ok_or_else(|| missing("writer"))?;

        Ok(Step {
            name: self.name,
            reader,
            processor,
            writer,
            cancellation: self.cancellation,
            counter: self.counter.unwrap_or_default(),
        })
    }
}
