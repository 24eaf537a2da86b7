//! Core domain types and port definitions for rustwrap.
//!
//! Everything here is free of process and socket code: the output filter,
//! the RCON wire format, the reconnect budget and the console sink port.
//! `rustwrap-runtime` drives these against a real child process and a
//! real WebSocket.

#![deny(unused_crate_dependencies)]

pub mod command;
pub mod console;
pub mod filter;
pub mod ports;
pub mod protocol;
pub mod rcon;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export commonly used types for convenience
pub use command::StartupCommand;
pub use console::{LocalCommand, QUIT_COMMAND, not_connected_notice};
pub use filter::{ClassifiedLine, FilterState, OutputFilter};
pub use ports::{ConsoleSink, CoreError, LogLevel};
pub use protocol::{ConsolePacket, ProtocolError, decode_frame};
pub use rcon::{
    BudgetVerdict, RconConfig, RconState, ReconnectBudget, WaitClock, rounded_secs,
};
