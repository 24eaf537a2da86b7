//! Console sink backed by `tracing`.

use rustwrap_core::ConsoleSink;

/// Target used for game console lines, so they can be filtered separately
/// from the wrapper's own diagnostics (`RUST_LOG=console=info,warn`).
pub const CONSOLE_TARGET: &str = "console";

/// Writes console lines as tracing events under [`CONSOLE_TARGET`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ConsoleSink for TracingSink {
    fn info(&self, text: &str) {
        tracing::info!(target: CONSOLE_TARGET, "{text}");
    }

    fn warn(&self, text: &str) {
        tracing::warn!(target: CONSOLE_TARGET, "{text}");
    }

    fn error(&self, text: &str) {
        tracing::error!(target: CONSOLE_TARGET, "{text}");
    }

    fn debug(&self, text: &str) {
        tracing::debug!(target: CONSOLE_TARGET, "{text}");
    }
}
