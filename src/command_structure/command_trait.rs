use std::process::ExitCode;

use async_trait::async_trait;
use clap::Parser;
use serde::Serialize;
use tracing::Instrument;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{filter::LevelFilter, prelude::*, reload};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::command_structure::logging_args::LoggingArgs;

#[async_trait]
pub trait Command {
    /// Binary name, attached to every log line of the run.
    const NAME: &'static str;

    type PersistedMemory: Sync + Send;
    type Args: Parser + Validate + AsRef<LoggingArgs> + Send + Sync + std::fmt::Debug;
    type Output: Serialize + Send + Sync;
    type Error: From<ValidationErrors> + std::error::Error + Sync + Send + 'static;

    /// Builds the clients and repositories the command works with.
    async fn bootstrap(args: &Self::Args) -> Result<Self::PersistedMemory, Self::Error>;

    /// The actual work of the command.
    async fn run(
        args: Self::Args,
        connections: &Self::PersistedMemory,
    ) -> Result<Self::Output, Self::Error>;

    /// A pre-configured main function: sets up logging, parses and validates the
    /// arguments, bootstraps and runs the command, then prints its output as JSON.
    /// Any error ends the process with exit status 1.
    async fn main() -> ExitCode {
        if let Err(e) = LogTracer::init() {
            eprintln!("error: unable to route log records into tracing: {e}");
            return ExitCode::FAILURE;
        }

        let app_name = concat!(env!("CARGO_PKG_NAME"), "-", env!("CARGO_PKG_VERSION")).to_string();
        let (non_blocking_writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
        let bunyan_formatting_layer = BunyanFormattingLayer::new(app_name, non_blocking_writer);

        // Instantiate a tracing subscriber with reloadable level filter
        let (filter, reload_handle) = reload::Layer::new(LevelFilter::WARN);
        tracing_subscriber::registry()
            .with(filter)
            .with(JsonStorageLayer)
            .with(bunyan_formatting_layer)
            .init();

        let args = Self::Args::parse();
        let level = args.as_ref().level_filter();
        reload_handle
            .modify(|filter| *filter = level)
            .unwrap_or_else(|e| tracing::error!(error= ?e, "{:?}", e));

        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("command", command = Self::NAME, run_id = %run_id);

        match Self::execute(args).instrument(span).await {
            Ok(output) => match serde_json::to_string_pretty(&output) {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    tracing::error!(error = ?e, "unable to serialize command output");
                    eprintln!("error: unable to serialize command output: {e}");
                    ExitCode::FAILURE
                }
            },
            Err(e) => {
                tracing::error!(error = ?e, "{e}");
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        }
    }

    /// Validation, bootstrap and run of one invocation.
    async fn execute(args: Self::Args) -> Result<Self::Output, Self::Error> {
        args.validate()?;
        tracing::info!(args = ?args, "Execution started");

        let connections = Self::bootstrap(&args).await?;
        Self::run(args, &connections).await
    }
}

#[macro_export]
macro_rules! command_main {
    ($command: ty) => {
        #[tokio::main]
        async fn main() -> std::process::ExitCode {
            use $crate::command_structure::command_trait::Command;
            <$command>::main().await
        }
    };
}
