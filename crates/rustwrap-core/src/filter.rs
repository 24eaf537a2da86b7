//! Game console output filtering.
//!
//! The dedicated server is chatty: it repeats bundle-loading progress,
//! dumps shader compiler diagnostics and library fallback probes, and once
//! RCON is up it echoes everything a second time. [`OutputFilter`] turns raw
//! stdout/stderr bytes into classified lines and drops the noise.

use std::collections::HashSet;

use tracing::trace;

use crate::ports::{ConsoleSink, LogLevel};

/// Prefix of the native library probe messages.
pub const LIBRARY_FALLBACK_MARKER: &str = "Fallback handler could not load library";

/// Shader compiler diagnostics, matched anywhere in the line.
pub const SHADER_MARKERS: [&str; 2] = ["ERROR: Shader ", "WARNING: Shader "];

/// Prefix of the repeated bundle-loading progress lines.
pub const BUNDLE_PROGRESS_MARKER: &str = "Loading Prefab Bundle ";

/// Prefix of managed exception reports.
pub const EXCEPTION_MARKER: &str = "Exception thrown";

/// Once a line with this prefix is seen, stdout is no longer forwarded.
pub const HOSTNAME_SENTINEL: &str = "hostname:";

/// A single line that survived filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub level: LogLevel,
    pub text: String,
}

impl ClassifiedLine {
    fn new(level: LogLevel, text: &str) -> Self {
        Self {
            level,
            text: text.to_string(),
        }
    }
}

/// Mutable state of one filtering run.
///
/// Lives exactly as long as one game process; there is no way to reset it.
#[derive(Debug, Default)]
pub struct FilterState {
    seen_progress: HashSet<String>,
    hostname_seen: bool,
}

impl FilterState {
    /// Whether the `hostname:` sentinel has been observed.
    pub const fn hostname_seen(&self) -> bool {
        self.hostname_seen
    }

    /// Whether a bundle progress token has already been forwarded.
    pub fn has_seen_progress(&self, token: &str) -> bool {
        self.seen_progress.contains(token)
    }
}

/// Stateful classifier between the child's output streams and the sink.
#[derive(Debug, Default)]
pub struct OutputFilter {
    state: FilterState,
}

impl OutputFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn state(&self) -> &FilterState {
        &self.state
    }

    /// Classify a raw output chunk.
    ///
    /// The chunk may hold several lines or a partial one; it is split on
    /// `\n`, decoded lossily, and every piece goes through the rules on its own.
    pub fn classify(&mut self, chunk: &[u8]) -> Vec<ClassifiedLine> {
        let text = String::from_utf8_lossy(chunk);
        text.split('\n')
            .filter_map(|line| self.classify_line(line))
            .collect()
    }

    /// Classify a chunk and hand the survivors to `sink`.
    pub fn forward(&mut self, chunk: &[u8], sink: &dyn ConsoleSink) {
        for line in self.classify(chunk) {
            sink.emit(line.level, &line.text);
        }
    }

    fn classify_line(&mut self, raw: &str) -> Option<ClassifiedLine> {
        let line = raw.trim();
        if line.is_empty() {
            return None;
        }

        if self.state.hostname_seen {
            trace!(line, "suppressing output after hostname sentinel");
            return None;
        }

        if line.starts_with(LIBRARY_FALLBACK_MARKER) {
            return Some(ClassifiedLine::new(LogLevel::Debug, line));
        }

        if SHADER_MARKERS.iter().any(|marker| line.contains(marker)) {
            return Some(ClassifiedLine::new(LogLevel::Debug, line));
        }

        if let Some(token) = line.strip_prefix(BUNDLE_PROGRESS_MARKER) {
            if !self.state.seen_progress.insert(token.trim().to_string()) {
                trace!(token, "suppressing duplicate bundle progress");
                return None;
            }
            return Some(ClassifiedLine::new(LogLevel::Info, line));
        }

        if line.starts_with(EXCEPTION_MARKER) {
            return Some(ClassifiedLine::new(LogLevel::Warn, line));
        }

        if line.starts_with(HOSTNAME_SENTINEL) {
            self.state.hostname_seen = true;
        }

        Some(ClassifiedLine::new(LogLevel::Info, line))
    }
}
