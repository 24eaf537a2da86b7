//! WebRcon wire format.
//!
//! Frames are UTF-8 JSON objects in both directions. Outbound commands carry
//! a fixed identifier because responses are never correlated; inbound frames
//! are only consulted for their `Message` text.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier stamped on every outbound packet.
pub const UNCORRELATED_IDENTIFIER: i32 = -1;

/// Client name reported to the server.
pub const CLIENT_NAME: &str = "WebRcon";

/// Command sent right after connecting; fixes the server's console echo.
pub const STATUS_PROBE: &str = "status";

/// Errors produced while encoding or decoding RCON frames.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Inbound frame was not a JSON object of the expected shape.
    #[error("Invalid JSON received: {0}")]
    Decode(#[source] serde_json::Error),

    /// Outbound packet could not be serialized.
    #[error("Failed to encode console packet: {0}")]
    Encode(#[source] serde_json::Error),
}

/// An outbound console command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConsolePacket {
    pub identifier: i32,
    pub message: String,
    pub name: String,
}

impl ConsolePacket {
    /// Wrap an operator command.
    pub fn command(text: impl Into<String>) -> Self {
        Self {
            identifier: UNCORRELATED_IDENTIFIER,
            message: text.into(),
            name: CLIENT_NAME.to_string(),
        }
    }

    /// The `status` probe sent once per successful connection.
    pub fn status_probe() -> Self {
        Self::command(STATUS_PROBE)
    }

    /// Serialize into a text frame payload.
    pub fn to_frame(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }
}

/// The only part of an inbound frame the wrapper looks at.
#[derive(Debug, Deserialize)]
struct InboundFrame {
    #[serde(rename = "Message", default)]
    message: Option<serde_json::Value>,
}

/// Decode an inbound text frame into console lines.
///
/// A `Message` that is absent, empty or not a string yields no lines.
/// Multi-line messages are split so each line becomes its own log entry;
/// blank lines are dropped. Only payloads that are not JSON objects fail.
pub fn decode_frame(payload: &str) -> Result<Vec<String>, ProtocolError> {
    let frame: InboundFrame = serde_json::from_str(payload).map_err(ProtocolError::Decode)?;

    let Some(serde_json::Value::String(message)) = frame.message else {
        return Ok(Vec::new());
    };

    Ok(message
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}
