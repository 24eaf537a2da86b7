//! Console sink port for classified log output.
//!
//! This port abstracts the destination of every user-visible console line:
//! filtered game output, RCON responses, and the wrapper's own notices.
//! Formatting, persistence and shipping are entirely the sink's concern.

use std::fmt;

/// Severity attached to a console line before it reaches the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Port for emitting pre-classified console text.
///
/// Implementations must be thread-safe and should not block; failures
/// inside a sink are never reported back to the caller.
#[cfg_attr(test, mockall::automock)]
pub trait ConsoleSink: Send + Sync {
    /// Emit an informational line.
    fn info(&self, text: &str);

    /// Emit a warning line.
    fn warn(&self, text: &str);

    /// Emit an error line.
    fn error(&self, text: &str);

    /// Emit a diagnostic line.
    fn debug(&self, text: &str);

    /// Emit `text` at the given level.
    fn emit(&self, level: LogLevel, text: &str) {
        match level {
            LogLevel::Debug => self.debug(text),
            LogLevel::Info => self.info(text),
            LogLevel::Warn => self.warn(text),
            LogLevel::Error => self.error(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    #[test]
    fn emit_dispatches_on_level() {
        let mut sink = MockConsoleSink::new();
        sink.expect_warn()
            .with(eq("Exception thrown: boom"))
            .times(1)
            .return_const(());
        sink.expect_debug().with(eq("noise")).times(1).return_const(());
        sink.expect_info().never();
        sink.expect_error().never();

        let sink = DispatchOnly(&sink);
        sink.emit(LogLevel::Warn, "Exception thrown: boom");
        sink.emit(LogLevel::Debug, "noise");
    }

    /// Forwards to the mock without overriding `emit`.
    struct DispatchOnly<'a>(&'a MockConsoleSink);

    impl ConsoleSink for DispatchOnly<'_> {
        fn info(&self, text: &str) {
            self.0.info(text);
        }
        fn warn(&self, text: &str) {
            self.0.warn(text);
        }
        fn error(&self, text: &str) {
            self.0.error(text);
        }
        fn debug(&self, text: &str) {
            self.0.debug(text);
        }
    }

    #[test]
    fn level_display_is_lowercase() {
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert_eq!(LogLevel::Error.to_string(), "error");
    }
}
