//! csvclean - simple character separated value escape utility

use std::{process::ExitCode, sync::Arc};

use clap::{Parser, error::ErrorKind};
use log::{debug, error};

use csvclean::{
    CleanError,
    cli::{Cli, help_text},
    core::{
        cancel::CancellationToken,
        coordinator::{Outcome, coordinate},
        counter::LineCounter,
        job::CleanJob,
    },
    logging::init_logger,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(err @ CleanError::Usage(_)) => {
            println!("{}", err);
            println!("{}", help_text());
            return ExitCode::FAILURE;
        }
        Err(err) => {
            println!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    init_logger(config.verbose);

    debug!(
        "Using {:#04x} ({:?}) as delimiter",
        config.delimiter, config.delimiter as char
    );

    let cancellation = CancellationToken::new();
    let counter = Arc::new(LineCounter::new());
    let job = CleanJob::new(config, cancellation.clone(), Arc::clone(&counter));

    let result = coordinate(
        move || job.run(),
        cancellation,
        counter,
        tokio::signal::ctrl_c(),
    )
    .await;

    match result {
        Ok(outcome) => {
            let execution = outcome.execution();
            debug!(
                "Execution finished: {} lines written in {:?}",
                execution.step.write_count, execution.duration
            );
            if let Outcome::Interrupted { processed, .. } = outcome {
                debug!("Stopped cleanly after {} lines", processed);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Error occurred during execution: {}", err);
            ExitCode::FAILURE
        }
    }
}
