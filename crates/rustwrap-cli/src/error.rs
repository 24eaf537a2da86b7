//! CLI error types and exit code mapping.

use rustwrap_core::CoreError;
use thiserror::Error;

/// Errors raised before the wrapper starts.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid or missing configuration.
    #[error("{0}")]
    Config(String),

    /// Any other core failure.
    #[error("{0}")]
    Core(String),
}

impl CliError {
    /// Exit code following sysexits.h where one fits.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 78, // EX_CONFIG
            Self::Core(_) => 1,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Configuration(msg) => Self::Config(msg),
            other @ CoreError::Protocol(_) => Self::Core(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_map_to_ex_config() {
        let err = CliError::from(CoreError::Configuration("missing".into()));
        assert_eq!(err.exit_code(), 78);
        assert_eq!(err.to_string(), "missing");
    }
}
