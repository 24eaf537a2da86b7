//! Command-line front end for rustwrap.
//!
//! `main.rs` only wires process-global concerns (environment, tracing,
//! signals, stdin); everything testable lives here.

#![deny(unused_crate_dependencies)]

// Used by main.rs
use anyhow as _;
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod error;
pub mod parser;
pub mod signals;
pub mod sink;

use std::sync::Arc;

use rustwrap_core::ConsoleSink;
use rustwrap_runtime::Wrapper;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;

pub use error::CliError;
pub use parser::Cli;
pub use sink::TracingSink;

/// Run the wrapper for `cli` and return the process exit code.
///
/// Configuration errors are reported through `sink` and nothing is spawned.
pub async fn run(
    cli: Cli,
    sink: Arc<dyn ConsoleSink>,
    input: UnboundedReceiver<String>,
    shutdown: CancellationToken,
) -> i32 {
    let config = match bootstrap::wrapper_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            sink.error(&format!("Error: {e}"));
            return e.exit_code();
        }
    };

    let exit = Wrapper::new(config, sink).run(input, shutdown).await;
    tracing::debug!(?exit, "wrapper finished");
    exit.code()
}
