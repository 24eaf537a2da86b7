//! Port definitions (trait abstractions) for external collaborators.
//!
//! The core never formats, persists or ships console output itself; it
//! hands classified lines to a [`ConsoleSink`] supplied by the adapter.

pub mod console_sink;

use thiserror::Error;

pub use console_sink::{ConsoleSink, LogLevel};

use crate::protocol::ProtocolError;

/// Core error type for semantic domain errors.
///
/// Adapters map this onto their own error types (CLI exit codes).
#[derive(Debug, Error)]
pub enum CoreError {
    /// The wrapper was configured in a way that cannot start a server.
    #[error("{0}")]
    Configuration(String),

    /// An RCON frame could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
