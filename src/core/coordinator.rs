//! # Coordinator
//!
//! Runs a job on a blocking task while listening for an interrupt.
//!
//! Whichever happens first decides the path:
//!
//! - the job finishes: its result is returned as is;
//! - the interrupt fires: the processed count is logged, the cancellation token
//!   is set and the coordinator waits, without a deadline, for the job to stop
//!   at its next record boundary. A job stopped this way is a success.

use std::{future::Future, io, sync::Arc};

use log::{info, warn};
use tokio::task::{self, JoinError};

use crate::CleanError;

use super::{cancel::CancellationToken, counter::LineCounter, job::JobExecution};

#[derive(Debug)]
pub enum Outcome {
    Completed(JobExecution),
    Interrupted {
        /// Records handled when the job acknowledged the stop request
        processed: u64,
        execution: JobExecution,
    },
}

impl Outcome {
    pub fn execution(&self) -> &JobExecution {
        match self {
            Outcome::Completed(execution) => execution,
            Outcome::Interrupted { execution, .. } => execution,
        }
    }
}

pub async fn coordinate<F, I>(
    job: F,
    cancellation: CancellationToken,
    counter: Arc<LineCounter>,
    interrupt: I,
) -> Result<Outcome, CleanError>
where
    F: FnOnce() -> Result<JobExecution, CleanError> + Send + 'static,
    I: Future<Output = io::Result<()>>,
{
    let mut handle = task::spawn_blocking(job);

    tokio::select! {
        biased;

        joined = &mut handle => flatten(joined).map(Outcome::Completed),

        signal = interrupt => {
            if let Err(error) = signal {
                warn!("Unable to listen for interrupts: {}", error);
                return flatten(handle.await).map(Outcome::Completed);
            }

            info!(
                "Processing interrupted after processing {} lines",
                counter.get()
            );
            cancellation.cancel();

            let execution = flatten(handle.await)?;
            Ok(Outcome::Interrupted {
                processed: counter.get(),
                execution,
            })
        }
    }
}

fn flatten(
    joined: Result<Result<JobExecution, CleanError>, JoinError>,
) -> Result<JobExecution, CleanError> {
    joined.map_err(|error| CleanError::Task(error.to_string()))?
}
