//! In-memory sink for tests in this and downstream crates.

use std::sync::Mutex;

use crate::ports::{ConsoleSink, LogLevel};

/// Records every line it receives, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, level: LogLevel, text: &str) {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((level, text.to_string()));
    }

    /// Snapshot of everything recorded so far.
    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Lines recorded at `level`.
    pub fn lines_at(&self, level: LogLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, text)| text)
            .collect()
    }

    /// Whether any line at `level` contains `needle`.
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.lines_at(level).iter().any(|line| line.contains(needle))
    }

    /// Number of lines, at any level, containing `needle`.
    pub fn count_containing(&self, needle: &str) -> usize {
        self.entries()
            .iter()
            .filter(|(_, text)| text.contains(needle))
            .count()
    }
}

impl ConsoleSink for RecordingSink {
    fn info(&self, text: &str) {
        self.push(LogLevel::Info, text);
    }

    fn warn(&self, text: &str) {
        self.push(LogLevel::Warn, text);
    }

    fn error(&self, text: &str) {
        self.push(LogLevel::Error, text);
    }

    fn debug(&self, text: &str) {
        self.push(LogLevel::Debug, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order_with_levels() {
        let sink = RecordingSink::new();
        sink.info("one");
        sink.emit(LogLevel::Warn, "two");
        sink.error("three one");

        assert_eq!(sink.entries().len(), 3);
        assert_eq!(sink.lines_at(LogLevel::Warn), vec!["two".to_string()]);
        assert!(sink.contains(LogLevel::Error, "three"));
        assert_eq!(sink.count_containing("one"), 2);
    }
}
