//! RCON-over-WebSocket client.

mod client;

pub use client::{RconClient, RconEvent, RconHandle};
