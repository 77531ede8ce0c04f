use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use log::{debug, warn};

use crate::{
    CleanError,
    config::Configuration,
    files::{Output, open_files},
    item::{
        csv::{csv_reader::CsvItemReaderBuilder, csv_writer::CsvItemWriterBuilder},
        encapsulate::EncapsulateProcessor,
    },
    tasklet::swap::SwapTasklet,
};

use super::{
    cancel::CancellationToken,
    counter::LineCounter,
    step::{StepBuilder, StepExecution, StepStatus},
};

type JobResult<T> = Result<T, CleanError>;

#[derive(Debug)]
pub struct JobExecution {
    pub start: Instant,
    pub end: Instant,
    pub duration: Duration,
    pub step: StepExecution,
    /// Whether the staged output was copied back over the input
    pub swapped: bool,
}

/// One complete run: open the files, rewrite every record, then swap the
/// staged output back over the input when running in place.
///
/// Files are owned by [`CleanJob::run`] and closed on every exit path.
pub struct CleanJob {
    config: Configuration,
    cancellation: CancellationToken,
    counter: Arc<LineCounter>,
}

impl CleanJob {
    pub fn new(
        config: Configuration,
        cancellation: CancellationToken,
        counter: Arc<LineCounter>,
    ) -> Self {
        Self {
            config,
            cancellation,
            counter,
        }
    }

    /// Runs the job to completion or until the cancellation token is set.
    ///
    /// A stopped in-place run leaves the input untouched: the partial output
    /// is discarded with the staging file and `swapped` is `false`.
    pub fn run(&self) -> JobResult<JobExecution> {
        let start = Instant::now();
        let config = &self.config;

        debug!("Start of job on {:?}", config.input);

        let files = open_files(config)?;

        let step_execution = {
            let reader = CsvItemReaderBuilder::new()
                .delimiter(config.delimiter)
                .comment(config.comment)
                .source_path(&config.input)
                .from_reader(&files.input);

            let processor =
                EncapsulateProcessor::new(config.encapsulation.as_str(), config.has_header);

            let writer = CsvItemWriterBuilder::new()
                .delimiter(config.delimiter)
                .target_path(files.output.path())
                .from_writer(files.output.as_file());

            let step = StepBuilder::new("encapsulate")
                .reader(&reader)
                .processor(&processor)
                .writer(&writer)
                .cancellation(self.cancellation.clone())
                .counter(Arc::clone(&self.counter))
                .build()?;

            step.execute()?
        };

        let swapped = match (&files.output, step_execution.status) {
            (Output::Staged(temp), StepStatus::Completed) => {
                SwapTasklet::new(&files.input, &config.input, temp.as_file(), temp.path())
                    .execute()?;
                true
            }
            (Output::Staged(_), StepStatus::Stopped) => {
                warn!("Run stopped early, {:?} left untouched", config.input);
                false
            }
            (Output::File { .. }, _) => false,
        };

        debug!("End of job on {:?}", config.input);

        Ok(JobExecution {
            start,
            end: Instant::now(),
            duration: start.elapsed(),
            step: step_execution,
            swapped,
        })
    }
}
