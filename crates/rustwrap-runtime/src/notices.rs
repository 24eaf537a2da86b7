//! Operator-facing messages written to the console sink.

use std::time::Duration;

use rustwrap_core::rounded_secs;

use crate::process::ProcessExit;

pub const STARTING: &str = "Starting Rust...";
pub const STOP_REQUESTED: &str = "Received request to stop the process, stopping the game...";
pub const CONNECTION_CLOSED: &str = "Connection to server closed.";
pub const RECONNECTING_INPUT_DROPPED: &str =
    "RCON connection lost, console input was not sent. Waiting for RCON to come back...";

pub fn connected(elapsed: Duration) -> String {
    format!(
        "Connected to RCON ({}s). Generating the map now. Please wait until the server status switches to \"Running\".",
        rounded_secs(elapsed)
    )
}

pub fn waiting(elapsed: Duration) -> String {
    format!("Waiting for RCON to come up... ({}s)", rounded_secs(elapsed))
}

pub fn gave_up(max_wait: Duration) -> String {
    let secs = max_wait.as_secs();
    let limit = if secs >= 60 && secs % 60 == 0 {
        format!("{} minutes", secs / 60)
    } else {
        format!("{secs}s")
    };
    format!("RCON server took too long ({limit}) to start. Exiting...")
}

pub fn transmitting(command: &str) -> String {
    format!("Transmitting console input: {command}")
}

pub fn closed_with(code: Option<u16>, reason: &str) -> String {
    match (code, reason.is_empty()) {
        (Some(code), false) => format!("RCON closed the connection (code {code}): {reason}"),
        (Some(code), true) => format!("RCON closed the connection (code {code})"),
        (None, _) => "RCON closed the connection without a close frame".to_string(),
    }
}

pub fn process_exited(exit: ProcessExit) -> String {
    match exit {
        ProcessExit::Code(code) => format!("Main game process exited with code {code}"),
        other => format!("Main game process exited with {other}"),
    }
}
