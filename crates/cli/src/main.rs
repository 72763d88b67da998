mod commands;
mod error;
mod input;
mod output;
mod shutdown;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::commands::Cli;
use crate::error::CliError;
use crate::shutdown::{ExitCode, ShutdownCoordinator};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let shutdown = ShutdownCoordinator::install();

    let exit = match commands::run(cli, &shutdown).await {
        Ok(()) => {
            if shutdown.is_shutdown() {
                ExitCode::Interrupted
            } else {
                ExitCode::Success
            }
        }
        Err(err) if err.is_cancelled() => ExitCode::Interrupted,
        Err(err) => {
            report_error(&err);
            ExitCode::Failure
        }
    };
    exit.into()
}

// Logs go to stderr so csv output on stdout stays pipeable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn report_error(err: &CliError) {
    error!("{err}");
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        error!("Caused by: {cause}");
        source = cause.source();
    }
}
