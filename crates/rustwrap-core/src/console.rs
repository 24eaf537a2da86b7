//! Operator input handling before RCON is available.

/// The only command the wrapper acts on locally.
pub const QUIT_COMMAND: &str = "quit";

/// How a line typed before the RCON handshake is treated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalCommand {
    /// Ask the game server to shut down.
    Quit,
    /// Anything else; reported back and never forwarded to the child.
    Rejected(String),
}

impl LocalCommand {
    pub fn parse(line: &str) -> Self {
        let command = line.trim();
        if command == QUIT_COMMAND {
            Self::Quit
        } else {
            Self::Rejected(command.to_string())
        }
    }
}

/// Notice shown for input that cannot run yet.
pub fn not_connected_notice(command: &str) -> String {
    format!("Unable to run \"{command}\" due to RCON not being connected yet.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_is_recognised_after_trimming() {
        assert_eq!(LocalCommand::parse("quit"), LocalCommand::Quit);
        assert_eq!(LocalCommand::parse("  quit \r\n"), LocalCommand::Quit);
    }

    #[test]
    fn everything_else_is_rejected() {
        assert_eq!(
            LocalCommand::parse("say hi\n"),
            LocalCommand::Rejected("say hi".to_string())
        );
        assert_eq!(
            LocalCommand::parse("QUIT"),
            LocalCommand::Rejected("QUIT".to_string())
        );
        assert_eq!(
            not_connected_notice("help"),
            "Unable to run \"help\" due to RCON not being connected yet."
        );
    }
}
