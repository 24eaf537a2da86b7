//! Game process supervision.
//!
//! - `GameProcess` - shell spawn, signalling, exit classification
//! - `spawn_stream_reader` - byte-safe stdout/stderr line readers
//! - `shutdown_child` - SIGTERM → SIGKILL escalation

mod game;
pub mod shutdown;
mod stream;

pub use game::{GameProcess, ProcessExit};
pub use shutdown::{send_sigterm, shutdown_child};
pub(crate) use stream::pump_lines;
pub use stream::{ProcessOutput, StreamKind, spawn_stream_reader};
