//! rustwrap entry point.

use std::sync::Arc;

use clap::Parser;
use rustwrap_cli::{Cli, TracingSink, signals};
use rustwrap_runtime::spawn_input_reader;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap reads RCON_* from the environment
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let shutdown = CancellationToken::new();
    signals::cancel_on_shutdown_signal(shutdown.clone())?;

    let input = spawn_input_reader(tokio::io::stdin());
    let code = rustwrap_cli::run(cli, Arc::new(TracingSink), input, shutdown).await;

    std::process::exit(code);
}
