mod commands;
mod display;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tasker_backend::{Config, TaskRepository};
use tracing::{error, Level};
use tracing_subscriber::EnvFilter;

use crate::commands::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;
    let store = tasker_backend::connect(&config)
        .await
        .context("failed to connect to the task store")?;
    let repo = TaskRepository::new(store.clone()).with_duplicate_policy(config.duplicates);

    let mut stdout = std::io::stdout().lock();
    let result = commands::execute(cli.command, &repo, &mut stdout).await;

    // Close even when the command failed; its error wins.
    let closed = store.close().await;
    result?;
    closed.context("failed to close the task store")
}

fn init_tracing(verbose: u8) {
    // Quiet by default so only failures reach stderr
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
