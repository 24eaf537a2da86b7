//! Runtime error types.

use std::io;

use thiserror::Error;

/// Failures starting or wiring the game process.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The shell could not be spawned.
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// A piped stdio handle was not available after spawn.
    #[error("Child process has no {0} pipe")]
    MissingPipe(&'static str),
}
