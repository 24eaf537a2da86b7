//! Runtime for rustwrap: the supervised game process, the WebSocket RCON
//! client and the event loop that hands the console from one to the other.
//!
//! # Modules
//!
//! - [`process`] - spawning, output readers, SIGTERM/SIGKILL shutdown
//! - [`rcon`] - connect loop with a cumulative reconnect budget
//! - [`wrapper`] - the single-task event loop
//! - [`input`] - operator console reader

#![deny(unused_crate_dependencies)]

// Used only by integration tests.
#[cfg(test)]
use serde_json as _;

pub mod error;
pub mod input;
pub mod notices;
pub mod process;
pub mod rcon;
pub mod wrapper;

pub use error::RuntimeError;
pub use input::spawn_input_reader;
pub use process::{GameProcess, ProcessExit, ProcessOutput, StreamKind};
pub use rcon::{RconClient, RconEvent, RconHandle};
pub use wrapper::{DEFAULT_SHUTDOWN_GRACE, Wrapper, WrapperConfig, WrapperExit};
