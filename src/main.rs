//! `dynamodb-bulk` binary: purge, dump and seed DynamoDB tables from the command line.

mod cli;

use dynamodb_bulk::emitter::{self, Messages};
use dynamodb_bulk::error::{Error, Result};
use dynamodb_bulk::logging;
use dynamodb_bulk::spinner::Spinner;

use clap::Parser;
use std::process::ExitCode;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Span;

/// Where progress messages end up.
enum Progress {
    Spinner(Spinner),
    Log(JoinHandle<()>),
}

impl Progress {
    fn start(messages: Messages, verbose: bool, command: &str, span: &Span) -> Self {
        if verbose {
            Self::Log(tokio::spawn(log_messages(messages, span.clone())))
        } else {
            Self::Spinner(Spinner::start(messages, format!("starting {command}")))
        }
    }

    async fn stop(self) {
        match self {
            Self::Spinner(spinner) => spinner.stop(None).await,
            Self::Log(handle) => {
                if let Err(error) = handle.await {
                    tracing::debug!(%error, "progress log task failed");
                }
            }
        }
    }
}

async fn log_messages(mut messages: Messages, span: Span) {
    while let Ok(message) = messages.get_message().await {
        tracing::info!(parent: &span, "{message}");
    }
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        cancel.cancel();
    }
}

fn failure_message(error: &Error) -> &'static str {
    if error.is_decode_error() {
        "could not convert item data"
    } else {
        "command failed"
    }
}

async fn run(cli: cli::Cli, cancel: CancellationToken, span: Span) -> Result<()> {
    let (emitter, messages) = emitter::channel(emitter::DEFAULT_CAPACITY);
    let progress = Progress::start(messages, cli.global.verbose, cli.command.name(), &span);
    let result = cli
        .command
        .execute(&cli.global, &emitter, cancel, span)
        .await;
    drop(emitter);
    progress.stop().await;
    result
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    logging::init(cli.global.verbose);
    let span = tracing::info_span!("dynamodb_bulk", command = cli.command.name(), dry_run = cli.global.dry_run);

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    match run(cli, cancel, span.clone()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(parent: &span, %error, "{}", failure_message(&error));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::decode(Error::Decode("bad number".to_string()), "could not convert item data")]
    #[case::unsupported(Error::UnsupportedType("SS".to_string()), "could not convert item data")]
    #[case::cancelled(Error::Cancelled, "command failed")]
    #[case::config(Error::Config("table name is empty".to_string()), "command failed")]
    fn test_failure_message(#[case] error: Error, #[case] expected: &str) {
        assert_eq!(failure_message(&error), expected);
    }

    #[tokio::test]
    async fn test_stop_after_log_task_failed() {
        let handle = tokio::spawn(async { panic!("log task failed") });
        Progress::Log(handle).stop().await;
    }

    #[tokio::test]
    async fn test_stop_waits_for_log_task() {
        let (emitter, messages) = emitter::channel(emitter::DEFAULT_CAPACITY);
        let progress = Progress::start(messages, true, "purge", &Span::none());
        drop(emitter);
        progress.stop().await;
    }
}
