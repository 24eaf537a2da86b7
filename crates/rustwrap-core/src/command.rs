//! Startup command assembly.

use std::fmt;

use crate::ports::CoreError;

/// Shell command line that starts the game server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupCommand(String);

impl StartupCommand {
    /// Join the caller's arguments with single spaces.
    ///
    /// Fails when nothing but whitespace remains, before any process exists.
    pub fn from_args<I, S>(args: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = args
            .into_iter()
            .map(|arg| arg.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(" ");

        if joined.trim().is_empty() {
            return Err(CoreError::Configuration(
                "Please specify a startup command.".to_string(),
            ));
        }

        Ok(Self(joined))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StartupCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_with_single_spaces() {
        let cmd = StartupCommand::from_args([
            "./RustDedicated",
            "-batchmode",
            "+server.port",
            "28015",
        ])
        .unwrap();
        assert_eq!(cmd.as_str(), "./RustDedicated -batchmode +server.port 28015");
    }

    #[test]
    fn empty_arguments_are_a_configuration_error() {
        let err = StartupCommand::from_args(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, CoreError::Configuration(_)));
        assert_eq!(err.to_string(), "Please specify a startup command.");

        assert!(StartupCommand::from_args(["", "  "]).is_err());
    }
}
